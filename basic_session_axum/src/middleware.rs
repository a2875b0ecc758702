use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{HeaderValue, header::SET_COOKIE};

use super::error::{IntoResponseError, error_response, unauthorized};
use super::session::AuthUser;
use super::state::AuthState;

/// Resolves the session and Basic credentials of every request
///
/// Inserts the [`Resolution`](basic_session::Resolution) and, when
/// authenticated, an [`AuthUser`] into the request extensions, then appends
/// any `Set-Cookie` produced by login or session rotation to the response.
/// Invalid credentials are answered with 401 before routing.
pub async fn resolve_session(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let resolution = match state
        .sessions
        .resolve_request(req.headers())
        .await
        .into_response_error()
    {
        Ok(resolution) => resolution,
        Err(err) => return error_response(err),
    };

    if let Some(principal) = resolution.principal.clone() {
        req.extensions_mut().insert(AuthUser::from(principal));
    }
    let set_cookie: Vec<HeaderValue> = resolution
        .headers
        .get_all(SET_COOKIE)
        .iter()
        .cloned()
        .collect();
    req.extensions_mut().insert(resolution);

    let mut response = next.run(req).await;
    for value in set_cookie {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

/// Guard for routes that need any authenticated principal: 401 otherwise
pub async fn require_user(req: Request, next: Next) -> Response {
    if req.extensions().get::<AuthUser>().is_none() {
        tracing::debug!(path = %req.uri().path(), "Access denied: authentication required");
        return unauthorized();
    }
    next.run(req).await
}

/// Guard for admin routes: 401 when anonymous, 403 when not an admin
pub async fn require_admin(req: Request, next: Next) -> Response {
    let Some(user) = req.extensions().get::<AuthUser>() else {
        tracing::debug!(path = %req.uri().path(), "Access denied: authentication required");
        return unauthorized();
    };

    if !user.is_admin {
        tracing::warn!(
            account = %user.account,
            path = %req.uri().path(),
            "Access denied: admin role required"
        );
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    tracing::debug!(account = %user.account, "Admin access granted");
    next.run(req).await
}
