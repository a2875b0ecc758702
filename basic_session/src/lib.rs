//! basic_session - Cookie sessions backed by HTTP Basic authentication
//!
//! This crate keeps server-side sessions in a cache store, checks Basic
//! credentials against a user store, and rotates the session id whenever a
//! request authenticates a different principal (session-fixation protection).
//! It is framework-agnostic: everything works on `http::HeaderMap`.

mod session;
mod storage;
mod userdb;
mod utils;

pub use session::{
    Resolution, SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME, SESSION_FIXATION_POLICY,
    SessionConfig, SessionError, SessionFixationPolicy, SessionManager, User as SessionUser,
    get_session_id_from_headers,
};

pub use userdb::{User, UserError, UserStore};

pub use utils::UtilError;
