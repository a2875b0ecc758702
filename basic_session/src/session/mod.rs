mod config;
mod errors;
mod main;
mod types;

pub use config::{
    SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME, SESSION_FIXATION_POLICY, SessionConfig,
    SessionFixationPolicy,
};
pub use errors::SessionError;
pub use main::{SessionManager, get_session_id_from_headers};
pub use types::{Resolution, User};
