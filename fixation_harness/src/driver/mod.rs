mod http_client;
mod router;

use std::fmt;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue, StatusCode};

use crate::error::DriverError;

pub use http_client::HttpDriver;
pub use router::RouterDriver;

/// Opaque session identifier as carried in the session cookie
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({})", self.0)
    }
}

/// Account name and password sent as HTTP Basic credentials
#[derive(Clone)]
pub struct Credentials {
    pub account: String,
    password: String,
}

impl Credentials {
    pub fn new(account: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            password: password.into(),
        }
    }

    /// `Authorization` header value for these credentials
    pub fn authorization_value(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.account, self.password));
        format!("Basic {encoded}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// What a single request produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub status: StatusCode,
    /// Session token set by the response, if any
    pub session: Option<SessionToken>,
}

/// Sends one GET request against the application under test
///
/// No cookie jar is kept and redirects are not followed: the only session
/// presented is the one passed in, and the only session reported is the one
/// the response itself set.
#[async_trait]
pub trait RequestDriver: Send + Sync {
    async fn send(
        &self,
        path: &str,
        credentials: Option<&Credentials>,
        session: Option<&SessionToken>,
    ) -> Result<Observation, DriverError>;
}

/// Request headers carrying the optional credentials and session cookie
pub(crate) fn request_headers(
    cookie_name: &str,
    credentials: Option<&Credentials>,
    session: Option<&SessionToken>,
) -> Result<HeaderMap, DriverError> {
    let mut headers = HeaderMap::new();
    if let Some(credentials) = credentials {
        let value = HeaderValue::from_str(&credentials.authorization_value())
            .map_err(|e| DriverError::InvalidRequest(format!("authorization: {e}")))?;
        headers.insert(AUTHORIZATION, value);
    }
    if let Some(session) = session {
        let value = HeaderValue::from_str(&format!("{cookie_name}={session}"))
            .map_err(|e| DriverError::InvalidRequest(format!("cookie: {e}")))?;
        headers.insert(COOKIE, value);
    }
    Ok(headers)
}

/// Session token set by a response, if any
///
/// Looks through every `Set-Cookie` header for `cookie_name`. A cookie that
/// is being cleared (empty value, or `Max-Age` of zero or less) does not
/// count as an issued token.
pub fn session_token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<SessionToken> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| {
            let mut parts = cookie.split(';').map(str::trim);
            let (name, value) = parts.next()?.split_once('=')?;
            if name != cookie_name || value.is_empty() {
                return None;
            }
            let cleared = parts.any(|attribute| {
                attribute
                    .split_once('=')
                    .filter(|(key, _)| key.eq_ignore_ascii_case("max-age"))
                    .and_then(|(_, age)| age.trim().parse::<i64>().ok())
                    .is_some_and(|age| age <= 0)
            });
            (!cleared).then(|| SessionToken::new(value))
        })
        .last()
}
