use chrono::{DateTime, Utc};
use http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::storage::{CacheData, StorageError};
use crate::userdb::User as DbUser;

/// Principal bound to a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub account: String,
    pub label: String,
    pub is_admin: bool,
}

impl From<DbUser> for User {
    fn from(db_user: DbUser) -> Self {
        Self {
            id: db_user.id,
            account: db_user.account,
            label: db_user.label,
            is_admin: db_user.is_admin,
        }
    }
}

/// Session entry as kept in the cache store. `user_id` is `None` for an
/// anonymous session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredSession {
    pub(crate) user_id: Option<String>,
    pub(crate) expires_at: DateTime<Utc>,
}

impl StoredSession {
    pub(crate) fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

impl TryFrom<StoredSession> for CacheData {
    type Error = StorageError;

    fn try_from(data: StoredSession) -> Result<Self, Self::Error> {
        Ok(Self {
            value: serde_json::to_string(&data)?,
        })
    }
}

impl TryFrom<CacheData> for StoredSession {
    type Error = StorageError;

    fn try_from(data: CacheData) -> Result<Self, Self::Error> {
        Ok(serde_json::from_str(&data.value)?)
    }
}

/// Outcome of resolving one request against the session store
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Authenticated principal, `None` for anonymous requests
    pub principal: Option<User>,
    /// Id of the live session after resolution
    pub session_id: Option<String>,
    /// `Set-Cookie` headers to add to the response
    pub headers: HeaderMap,
}

impl Resolution {
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.principal.as_ref().is_some_and(|u| u.is_admin)
    }
}
