use axum::response::{IntoResponse, Response};
use http::header::WWW_AUTHENTICATE;
use http::StatusCode;

use basic_session::SessionError;

use super::config::basic_challenge;

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Implementation for SessionError to map variants to appropriate status codes
impl<T> IntoResponseError<T> for Result<T, SessionError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                SessionError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                SessionError::HeaderError(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}

/// 401 with a Basic challenge
pub(crate) fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, basic_challenge())],
        "Unauthorized",
    )
        .into_response()
}

/// Turns a mapped error into a response; 401s carry the Basic challenge
pub(crate) fn error_response((status, message): (StatusCode, String)) -> Response {
    if status == StatusCode::UNAUTHORIZED {
        tracing::debug!("Unauthorized: {message}");
        return unauthorized();
    }
    if status.is_server_error() {
        tracing::error!("Request failed: {message}");
        // Internal details stay in the log.
        return (status, "Internal Server Error").into_response();
    }
    (status, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use basic_session::UtilError;

    #[test]
    fn test_invalid_credentials_maps_to_unauthorized() {
        let result: Result<(), SessionError> = Err(SessionError::InvalidCredentials);
        let (status, _) = result.into_response_error().unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_header_error_maps_to_bad_request() {
        let result: Result<(), SessionError> =
            Err(SessionError::HeaderError("Invalid cookie header".to_string()));
        let (status, message) = result.into_response_error().unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("Invalid cookie header"));
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        for err in [
            SessionError::Storage("down".to_string()),
            SessionError::Config("bad".to_string()),
            SessionError::Utils(UtilError::Crypto("rng".to_string())),
        ] {
            let result: Result<(), SessionError> = Err(err);
            let (status, _) = result.into_response_error().unwrap_err();
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_success_case() {
        let result: Result<String, SessionError> = Ok("Success".to_string());
        assert_eq!(result.into_response_error().unwrap(), "Success");
    }

    #[test]
    fn test_unauthorized_has_challenge() {
        let response = error_response((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let challenge = response
            .headers()
            .get(WWW_AUTHENTICATE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(challenge.starts_with("Basic realm="));
    }

    #[test]
    fn test_server_error_hides_details() {
        let response = error_response((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Storage error: secret detail".into(),
        ));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
    }
}
