mod basic;
mod resolve;
mod session;

pub use session::{SessionManager, get_session_id_from_headers};
