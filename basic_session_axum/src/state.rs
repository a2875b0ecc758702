use basic_session::{SessionConfig, SessionManager, UserStore};

/// Router state shared by the session middleware and the pages
#[derive(Clone)]
pub struct AuthState {
    pub sessions: SessionManager,
}

impl AuthState {
    pub fn new(config: SessionConfig, users: UserStore) -> Self {
        Self {
            sessions: SessionManager::new(config, users),
        }
    }

    /// State over the `user`/`user` and `admin`/`admin` demo accounts
    pub fn with_demo_accounts(config: SessionConfig) -> Self {
        Self {
            sessions: SessionManager::with_demo_accounts(config),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.sessions.config().cookie_name
    }
}
