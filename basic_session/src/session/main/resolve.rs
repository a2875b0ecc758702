use http::HeaderMap;
use http::header::SET_COOKIE;

use crate::session::config::SessionFixationPolicy;
use crate::session::errors::SessionError;
use crate::session::types::{Resolution, User as SessionUser};

use super::basic::basic_credentials_from_headers;
use super::session::{SessionManager, get_session_id_from_headers};

impl SessionManager {
    /// Resolves the principal of a request from its session cookie and
    /// Basic credentials.
    ///
    /// Valid Basic credentials always win over the session. When they name a
    /// different principal than the presented session, the configured
    /// [`SessionFixationPolicy`] decides whether the session id is rotated.
    /// Invalid credentials fail with [`SessionError::InvalidCredentials`].
    #[tracing::instrument(skip(self, headers))]
    pub async fn resolve_request(&self, headers: &HeaderMap) -> Result<Resolution, SessionError> {
        let presented = match get_session_id_from_headers(headers, &self.config.cookie_name)? {
            Some(session_id) => self
                .load_session(session_id)
                .await?
                .map(|stored| (session_id.to_string(), stored)),
            None => None,
        };

        let Some(credentials) = basic_credentials_from_headers(headers)? else {
            let Some((session_id, stored)) = presented else {
                return Ok(Resolution::default());
            };
            return Ok(Resolution {
                principal: self.principal_of(&stored),
                session_id: Some(session_id),
                headers: HeaderMap::new(),
            });
        };

        let Some(user) = self
            .users
            .verify_credentials(&credentials.account, &credentials.password)
        else {
            tracing::warn!(account = %credentials.account, "Rejected Basic credentials");
            return Err(SessionError::InvalidCredentials);
        };
        let principal = SessionUser::from(user);
        tracing::debug!(account = %principal.account, "Basic credentials accepted");

        match presented {
            Some((session_id, stored))
                if stored.user_id.as_deref() == Some(principal.id.as_str()) =>
            {
                Ok(Resolution {
                    principal: Some(principal),
                    session_id: Some(session_id),
                    headers: HeaderMap::new(),
                })
            }
            Some((session_id, _)) if !self.config.fixation_policy.rotates_id() => {
                tracing::warn!(
                    account = %principal.account,
                    "Rebinding presented session without changing its id"
                );
                self.store_session(&session_id, Some(&principal.id)).await?;
                Ok(Resolution {
                    principal: Some(principal),
                    session_id: Some(session_id),
                    headers: HeaderMap::new(),
                })
            }
            Some((old_session_id, _)) => {
                self.delete_session(&old_session_id).await?;
                let (session_id, headers) = self.create_session(Some(&principal.id)).await?;
                match self.config.fixation_policy {
                    SessionFixationPolicy::NewSession => tracing::info!(
                        account = %principal.account,
                        "Started new session after authentication"
                    ),
                    _ => tracing::info!(
                        account = %principal.account,
                        "Migrated session to a new id after authentication"
                    ),
                }
                Ok(Resolution {
                    principal: Some(principal),
                    session_id: Some(session_id),
                    headers,
                })
            }
            None => {
                let (session_id, headers) = self.create_session(Some(&principal.id)).await?;
                tracing::info!(account = %principal.account, "Created session after authentication");
                Ok(Resolution {
                    principal: Some(principal),
                    session_id: Some(session_id),
                    headers,
                })
            }
        }
    }

    /// Opens a session for a request that has none, keeping its principal.
    ///
    /// Public pages call this so that a first anonymous visit gets a session.
    pub async fn ensure_session(&self, resolution: &mut Resolution) -> Result<(), SessionError> {
        if resolution.session_id.is_some() {
            return Ok(());
        }

        let user_id = resolution.principal.as_ref().map(|u| u.id.clone());
        let (session_id, headers) = self.create_session(user_id.as_deref()).await?;
        resolution.session_id = Some(session_id);
        for value in headers.get_all(SET_COOKIE) {
            resolution.headers.append(SET_COOKIE, value.clone());
        }
        Ok(())
    }
}
