//! Session-fixation scenarios
//!
//! Both scenarios end with the same attack: a principal logs in while
//! presenting a session token the attacker already holds, then the attacker
//! replays that old token against the admin page. The replay must not be
//! served.

mod report;
mod runner;

use std::fmt;

use http::StatusCode;

use crate::driver::{Credentials, RequestDriver, SessionToken};
use crate::error::ScenarioError;

pub use report::{ScenarioReport, StepRecord};
use runner::Run;

/// Expected status of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Status(StatusCode),
    /// Anything except 200 OK
    NotOk,
}

impl Expect {
    pub fn matches(&self, status: StatusCode) -> bool {
        match self {
            Self::Status(expected) => *expected == status,
            Self::NotOk => status != StatusCode::OK,
        }
    }
}

impl fmt::Display for Expect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{status}"),
            Self::NotOk => f.write_str("anything but 200 OK"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    AuthenticatedUser,
    AnonymousStart,
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticatedUser => f.write_str("authenticated user"),
            Self::AnonymousStart => f.write_str("anonymous start"),
        }
    }
}

/// The token a scenario keeps presenting
///
/// Captured once and then only read: later responses may issue other tokens,
/// but the holder keeps the original, the way an attacker who planted it would.
#[derive(Debug, Clone, Default)]
pub struct TokenHolder {
    token: Option<SessionToken>,
}

impl TokenHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture(&mut self, token: SessionToken) {
        self.token = Some(token);
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }
}

fn user_credentials() -> Credentials {
    Credentials::new("user", "user")
}

fn admin_credentials() -> Credentials {
    Credentials::new("admin", "admin")
}

/// A regular user logs in, then an admin logs in on the user's session
///
/// | step | request                                  | expected          |
/// |------|------------------------------------------|-------------------|
/// | a    | `/user` as user, no token                | 200, issues T1    |
/// | b    | `/user` with T1                          | 200               |
/// | c    | `/admin` with T1                         | 403               |
/// | d    | `/admin` as admin with T1                | 200, issues T2≠T1 |
/// | e    | `/admin` with T1                         | not 200           |
#[tracing::instrument(skip_all)]
pub async fn authenticated_user_scenario<D>(driver: &D) -> Result<ScenarioReport, ScenarioError>
where
    D: RequestDriver + ?Sized,
{
    let user = user_credentials();
    let admin = admin_credentials();
    let mut run = Run::new(driver, Scenario::AuthenticatedUser);
    let mut holder = TokenHolder::new();

    let login = run
        .step("a", "/user", Some(&user), None, Expect::Status(StatusCode::OK))
        .await?;
    let t1 = run.issued_token("a", login.session)?;
    holder.capture(t1.clone());

    run.step("b", "/user", None, holder.token(), Expect::Status(StatusCode::OK))
        .await?;

    run.step(
        "c",
        "/admin",
        None,
        holder.token(),
        Expect::Status(StatusCode::FORBIDDEN),
    )
    .await?;

    let escalation = run
        .step(
            "d",
            "/admin",
            Some(&admin),
            holder.token(),
            Expect::Status(StatusCode::OK),
        )
        .await?;
    run.check_presented("d", &t1)?;
    run.check_rotated("d", &t1, escalation.session)?;

    run.step("e", "/admin", None, holder.token(), Expect::NotOk)
        .await?;

    Ok(run.finish())
}

/// An anonymous visitor is handed a session, then an admin logs in on it
///
/// | step | request                                  | expected          |
/// |------|------------------------------------------|-------------------|
/// | a    | `/`, no token                            | 200, issues T1    |
/// | b    | `/user` with T1                          | 401               |
/// | c    | `/admin` with T1                         | 401               |
/// | d    | `/admin` as admin with T1                | 200, issues T2≠T1 |
/// | e    | `/admin` with T1                         | not 200           |
#[tracing::instrument(skip_all)]
pub async fn anonymous_start_scenario<D>(driver: &D) -> Result<ScenarioReport, ScenarioError>
where
    D: RequestDriver + ?Sized,
{
    let admin = admin_credentials();
    let mut run = Run::new(driver, Scenario::AnonymousStart);
    let mut holder = TokenHolder::new();

    let visit = run
        .step("a", "/", None, None, Expect::Status(StatusCode::OK))
        .await?;
    let t1 = run.issued_token("a", visit.session)?;
    holder.capture(t1.clone());

    run.step(
        "b",
        "/user",
        None,
        holder.token(),
        Expect::Status(StatusCode::UNAUTHORIZED),
    )
    .await?;

    run.step(
        "c",
        "/admin",
        None,
        holder.token(),
        Expect::Status(StatusCode::UNAUTHORIZED),
    )
    .await?;

    let escalation = run
        .step(
            "d",
            "/admin",
            Some(&admin),
            holder.token(),
            Expect::Status(StatusCode::OK),
        )
        .await?;
    run.check_presented("d", &t1)?;
    run.check_rotated("d", &t1, escalation.session)?;

    run.step("e", "/admin", None, holder.token(), Expect::NotOk)
        .await?;

    Ok(run.finish())
}

/// Runs both scenarios in order, stopping at the first failure
pub async fn run_all<D>(driver: &D) -> Result<Vec<ScenarioReport>, ScenarioError>
where
    D: RequestDriver + ?Sized,
{
    let authenticated = authenticated_user_scenario(driver).await?;
    let anonymous = anonymous_start_scenario(driver).await?;
    tracing::info!("All session fixation scenarios passed");
    Ok(vec![authenticated, anonymous])
}
