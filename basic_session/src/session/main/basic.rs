use headers::{Authorization, HeaderMapExt, authorization::Basic};
use http::header::{AUTHORIZATION, HeaderMap};

use crate::session::errors::SessionError;

pub(super) struct Credentials {
    pub(super) account: String,
    pub(super) password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Extracts Basic credentials from the `Authorization` header.
///
/// Other schemes are ignored and yield `Ok(None)`. A Basic header that does
/// not decode to `account:password` is rejected.
pub(super) fn basic_credentials_from_headers(
    headers: &HeaderMap,
) -> Result<Option<Credentials>, SessionError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    // scheme token runs up to the first whitespace or the end of the value
    let scheme = value
        .as_bytes()
        .split(|b| b.is_ascii_whitespace())
        .next()
        .unwrap_or_default();
    if !scheme.eq_ignore_ascii_case(b"basic") {
        tracing::debug!("Ignoring non-Basic Authorization header");
        return Ok(None);
    }

    match headers.typed_try_get::<Authorization<Basic>>() {
        Ok(Some(auth)) => Ok(Some(Credentials {
            account: auth.username().to_string(),
            password: auth.password().to_string(),
        })),
        Ok(None) | Err(_) => {
            tracing::debug!("Malformed Basic Authorization header");
            Err(SessionError::InvalidCredentials)
        }
    }
}
