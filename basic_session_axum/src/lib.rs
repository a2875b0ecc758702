mod config;
mod error;
mod middleware;
mod pages;
mod router;
mod session;
mod state;

pub use config::BASIC_AUTH_REALM;
pub use error::IntoResponseError;
pub use middleware::{require_admin, require_user, resolve_session};
pub use router::{app_router, app_router_no_trace};
pub use session::AuthUser;
pub use state::AuthState;

// Re-export the core types callers need to build an `AuthState`
pub use basic_session::{
    Resolution, SessionConfig, SessionFixationPolicy, SessionManager, UserStore,
};
