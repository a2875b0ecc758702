use async_trait::async_trait;
use axum::{Router, body::Body};
use http::{Method, Request};
use tower::ServiceExt;

use super::{
    Credentials, Observation, RequestDriver, SessionToken, request_headers,
    session_token_from_headers,
};
use crate::config::DRIVER_COOKIE_NAME;
use crate::error::DriverError;

/// Dispatches requests in-process through an axum [`Router`]
///
/// Each request goes through a clone of the router via `oneshot`, so all
/// requests share whatever state the router was built with.
#[derive(Clone)]
pub struct RouterDriver {
    router: Router,
    cookie_name: String,
}

impl RouterDriver {
    /// Driver using the [`DRIVER_COOKIE_NAME`] session cookie
    pub fn new(router: Router) -> Self {
        Self {
            router,
            cookie_name: DRIVER_COOKIE_NAME.clone(),
        }
    }

    pub fn with_cookie_name(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = cookie_name.into();
        self
    }
}

#[async_trait]
impl RequestDriver for RouterDriver {
    async fn send(
        &self,
        path: &str,
        credentials: Option<&Credentials>,
        session: Option<&SessionToken>,
    ) -> Result<Observation, DriverError> {
        let mut request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())?;
        *request.headers_mut() = request_headers(&self.cookie_name, credentials, session)?;

        let response = match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        let observation = Observation {
            status: response.status(),
            session: session_token_from_headers(response.headers(), &self.cookie_name),
        };
        tracing::trace!(path, status = %observation.status, "In-process response");
        Ok(observation)
    }
}
