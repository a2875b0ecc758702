//! fixation_harness - verifies session-fixation protection for HTTP Basic logins
//!
//! A [`RequestDriver`] sends one GET request with optional Basic credentials
//! and an optional session cookie, and reports the status together with any
//! session token the response issued. The scenario runners sequence those
//! requests and fail on the first unexpected status or token.
//!
//! Two drivers are provided: [`RouterDriver`] dispatches in-process through an
//! axum [`Router`](axum::Router), [`HttpDriver`] talks to a listening server.

mod config;
mod driver;
mod error;
mod scenario;

pub use config::DRIVER_COOKIE_NAME;
pub use driver::{
    Credentials, HttpDriver, Observation, RequestDriver, RouterDriver, SessionToken,
    session_token_from_headers,
};
pub use error::{DriverError, ScenarioError};
pub use scenario::{
    Expect, Scenario, ScenarioReport, StepRecord, TokenHolder, anonymous_start_scenario,
    authenticated_user_scenario, run_all,
};
