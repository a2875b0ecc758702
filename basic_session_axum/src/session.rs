use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    response::Response,
};
use http::request::Parts;

use basic_session::SessionUser;

use super::error::unauthorized;

/// Authenticated principal of the current request, available as an Axum extractor
///
/// The [`resolve_session`](crate::resolve_session) middleware places it in the
/// request extensions. Extracting it on a request without a principal answers
/// 401 with a Basic challenge; use `Option<AuthUser>` on public pages.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use basic_session_axum::AuthUser;
///
/// async fn protected_handler(user: AuthUser) -> String {
///     format!("Hello, {}!", user.label)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    /// Unique user identifier
    pub id: String,
    /// Account name used for Basic login
    pub account: String,
    /// User's display name
    pub label: String,
    /// Whether the user has admin privileges
    pub is_admin: bool,
}

impl From<SessionUser> for AuthUser {
    fn from(session_user: SessionUser) -> Self {
        AuthUser {
            id: session_user.id,
            account: session_user.account,
            label: session_user.label,
            is_admin: session_user.is_admin,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or_else(|| {
            tracing::debug!("No authenticated user on request");
            unauthorized()
        })
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthUser>().cloned())
    }
}
