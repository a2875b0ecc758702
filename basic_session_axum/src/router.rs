//! Router for the protected demo application

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::middleware::{require_admin, require_user, resolve_session};
use super::pages::{admin_page, index, user_page};
use super::state::AuthState;

/// Create the application router with HTTP tracing
///
/// The endpoints are:
/// - `GET /` public; opens an anonymous session on first visit
/// - `GET /user` any authenticated principal
/// - `GET /admin` admin principals only
///
/// Every request passes through [`resolve_session`], which handles Basic
/// login and session-fixation protection before routing.
pub fn app_router(state: AuthState) -> Router {
    app_router_no_trace(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`app_router`] but without the HTTP tracing middleware.
pub fn app_router_no_trace(state: AuthState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/user", get(user_page).route_layer(from_fn(require_user)))
        .route("/admin", get(admin_page).route_layer(from_fn(require_admin)))
        .layer(from_fn_with_state(state.clone(), resolve_session))
        .with_state(state)
}
