use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use http::header::SET_COOKIE;

use basic_session::Resolution;

use super::error::{IntoResponseError, error_response};
use super::session::AuthUser;
use super::state::AuthState;

/// Public landing page. A first visit opens an anonymous session.
pub(super) async fn index(
    State(state): State<AuthState>,
    Extension(mut resolution): Extension<Resolution>,
    user: Option<AuthUser>,
) -> Response {
    let had_session = resolution.session_id.is_some();
    if let Err(err) = state
        .sessions
        .ensure_session(&mut resolution)
        .await
        .into_response_error()
    {
        return error_response(err);
    }

    let greeting = match user {
        Some(user) => format!("Hello, {}!", user.label),
        None => "Hello, anonymous!".to_string(),
    };

    let mut response = greeting.into_response();
    if !had_session {
        // Anything the middleware produced is appended by the middleware
        // itself; only the cookie opened here is added.
        for value in resolution.headers.get_all(SET_COOKIE) {
            response.headers_mut().append(SET_COOKIE, value.clone());
        }
    }
    response
}

pub(super) async fn user_page(user: AuthUser) -> String {
    format!("Hello user {}!", user.account)
}

pub(super) async fn admin_page(user: AuthUser) -> String {
    format!("Hello admin {}!", user.account)
}
