use chrono::Utc;
use http::header::{COOKIE, HeaderMap};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::session::config::{SessionConfig, session_ttl};
use crate::session::errors::SessionError;
use crate::session::types::{StoredSession, User as SessionUser};
use crate::storage::{CacheData, CacheStore, InMemoryCacheStore};
use crate::userdb::UserStore;
use crate::utils::{gen_random_string, header_set_cookie};

const SESSION_PREFIX: &str = "session";

/// Owns the session store and the account table for one application
///
/// Cloning is cheap; clones share the same stores.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<Mutex<Box<dyn CacheStore>>>,
    pub(super) users: Arc<UserStore>,
    pub(super) config: SessionConfig,
}

impl SessionManager {
    pub fn new(config: SessionConfig, users: UserStore) -> Self {
        tracing::info!(
            cookie_name = %config.cookie_name,
            max_age = config.max_age,
            fixation_policy = %config.fixation_policy,
            "Initializing session manager"
        );
        Self {
            store: Arc::new(Mutex::new(Box::new(InMemoryCacheStore::new()))),
            users: Arc::new(users),
            config,
        }
    }

    /// Session manager over the `user`/`user` and `admin`/`admin` accounts
    pub fn with_demo_accounts(config: SessionConfig) -> Self {
        Self::new(config, UserStore::with_demo_accounts())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    /// Creates a session bound to `user_id` (anonymous when `None`) and
    /// returns its id with the matching `Set-Cookie` header.
    pub async fn create_session(
        &self,
        user_id: Option<&str>,
    ) -> Result<(String, HeaderMap), SessionError> {
        let max_age = session_ttl(self.config.max_age)?;
        let session_id = gen_random_string(32)?;
        self.store_session(&session_id, user_id).await?;

        let mut headers = HeaderMap::new();
        header_set_cookie(
            &mut headers,
            &self.config.cookie_name,
            &session_id,
            max_age.num_seconds(),
        )?;

        tracing::debug!(anonymous = user_id.is_none(), "Created session");
        Ok((session_id, headers))
    }

    /// Writes (or overwrites) the entry for `session_id` with a fresh expiry.
    pub(super) async fn store_session(
        &self,
        session_id: &str,
        user_id: Option<&str>,
    ) -> Result<(), SessionError> {
        let max_age = self.config.max_age;
        let expires_at = Utc::now()
            .checked_add_signed(session_ttl(max_age)?)
            .ok_or_else(|| SessionError::Config(format!("Session expiry out of range: {max_age}")))?;
        let ttl = usize::try_from(max_age)
            .map_err(|_| SessionError::Config(format!("Session max age out of range: {max_age}")))?;

        let stored_session = StoredSession {
            user_id: user_id.map(str::to_string),
            expires_at,
        };
        let data = CacheData::try_from(stored_session)?;

        self.store
            .lock()
            .await
            .put_with_ttl(SESSION_PREFIX, session_id, data, ttl)
            .await?;
        Ok(())
    }

    /// Looks up a live session. Expired and unreadable entries are removed
    /// and reported as absent.
    pub(super) async fn load_session(
        &self,
        session_id: &str,
    ) -> Result<Option<StoredSession>, SessionError> {
        let mut store = self.store.lock().await;

        let Some(cached) = store.get(SESSION_PREFIX, session_id).await? else {
            tracing::debug!("Session not found");
            return Ok(None);
        };

        let stored_session = match StoredSession::try_from(cached) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Discarding unreadable session entry: {e}");
                store.remove(SESSION_PREFIX, session_id).await?;
                return Ok(None);
            }
        };

        if stored_session.is_expired() {
            tracing::debug!("Session expired at {}", stored_session.expires_at);
            store.remove(SESSION_PREFIX, session_id).await?;
            return Ok(None);
        }

        Ok(Some(stored_session))
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<(), SessionError> {
        self.store
            .lock()
            .await
            .remove(SESSION_PREFIX, session_id)
            .await?;
        Ok(())
    }

    /// Returns the principal bound to a live session, `None` for missing,
    /// expired or anonymous sessions.
    pub async fn get_user_from_session(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionUser>, SessionError> {
        let Some(stored_session) = self.load_session(session_id).await? else {
            return Ok(None);
        };
        Ok(self.principal_of(&stored_session))
    }

    pub(super) fn principal_of(&self, stored_session: &StoredSession) -> Option<SessionUser> {
        stored_session
            .user_id
            .as_deref()
            .and_then(|id| self.users.get_user(id))
            .map(SessionUser::from)
    }

    #[cfg(test)]
    pub(super) async fn put_raw(&self, session_id: &str, value: &str) {
        self.store
            .lock()
            .await
            .put_with_ttl(
                SESSION_PREFIX,
                session_id,
                CacheData {
                    value: value.to_string(),
                },
                60,
            )
            .await
            .unwrap();
    }
}

/// Finds the value of cookie `cookie_name` in the request's `Cookie` headers
pub fn get_session_id_from_headers<'a>(
    headers: &'a HeaderMap,
    cookie_name: &str,
) -> Result<Option<&'a str>, SessionError> {
    for cookie_header in headers.get_all(COOKIE) {
        let cookie_str = cookie_header.to_str().map_err(|e| {
            tracing::error!("Invalid cookie header: {}", e);
            SessionError::HeaderError("Invalid cookie header".to_string())
        })?;

        let session_id = cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
            let mut parts = s.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(k), Some(v)) if k == cookie_name && !v.is_empty() => Some(v),
                _ => None,
            }
        });

        if session_id.is_some() {
            return Ok(session_id);
        }
    }

    tracing::debug!("No session cookie '{}' found in cookies", cookie_name);
    Ok(None)
}
