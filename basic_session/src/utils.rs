use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use http::header::{HeaderMap, SET_COOKIE};
use ring::rand::SecureRandom;
use thiserror::Error;

pub(crate) fn base64url_encode(input: Vec<u8>) -> Result<String, UtilError> {
    Ok(URL_SAFE_NO_PAD.encode(input))
}

/// Random bytes from the system CSPRNG, base64url encoded without padding
pub(crate) fn gen_random_string(len: usize) -> Result<String, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut session_id = vec![0u8; len];
    rng.fill(&mut session_id)
        .map_err(|_| UtilError::Crypto("Failed to generate random string".to_string()))?;
    let encoded = base64url_encode(session_id)
        .map_err(|_| UtilError::Crypto("Failed to encode random string".to_string()))?;
    Ok(encoded)
}

pub(crate) fn header_set_cookie(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
    max_age: i64,
) -> Result<(), UtilError> {
    let cookie =
        format!("{name}={value}; SameSite=Lax; Secure; HttpOnly; Path=/; Max-Age={max_age}");
    headers.append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| UtilError::Cookie("Failed to parse cookie".to_string()))?,
    );
    Ok(())
}

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Cookie error: {0}")]
    Cookie(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_random_string_length() {
        // 32 bytes encode to 43 base64url characters without padding
        let s = gen_random_string(32).expect("random string");
        assert_eq!(s.len(), 43);
        assert!(
            s.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_gen_random_string_is_unique() {
        let a = gen_random_string(32).expect("random string");
        let b = gen_random_string(32).expect("random string");
        assert_ne!(a, b);
    }

    #[test]
    fn test_header_set_cookie() {
        let mut headers = HeaderMap::new();
        header_set_cookie(&mut headers, "SessionId", "abc", 600).expect("set cookie");

        let cookie = headers
            .get(SET_COOKIE)
            .expect("Set-Cookie header")
            .to_str()
            .expect("ascii");
        assert_eq!(
            cookie,
            "SessionId=abc; SameSite=Lax; Secure; HttpOnly; Path=/; Max-Age=600"
        );
    }

    #[test]
    fn test_header_set_cookie_rejects_invalid_value() {
        let mut headers = HeaderMap::new();
        let result = header_set_cookie(&mut headers, "SessionId", "bad\nvalue", 600);
        assert!(matches!(result, Err(UtilError::Cookie(_))));
        assert!(headers.is_empty());
    }
}
