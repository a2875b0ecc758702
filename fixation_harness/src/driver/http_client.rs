use async_trait::async_trait;
use reqwest::{Client, redirect::Policy};

use super::{
    Credentials, Observation, RequestDriver, SessionToken, request_headers,
    session_token_from_headers,
};
use crate::config::DRIVER_COOKIE_NAME;
use crate::error::DriverError;

/// Sends requests over HTTP to a listening server
///
/// The client has no cookie store and never follows redirects, so session
/// state only moves when a scenario passes a token explicitly.
#[derive(Clone, Debug)]
pub struct HttpDriver {
    client: Client,
    base_url: String,
    cookie_name: String,
}

impl HttpDriver {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:3000`
    ///
    /// Uses the [`DRIVER_COOKIE_NAME`] session cookie.
    pub fn new(base_url: impl Into<String>) -> Result<Self, DriverError> {
        let client = Client::builder().redirect(Policy::none()).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cookie_name: DRIVER_COOKIE_NAME.clone(),
        })
    }

    pub fn with_cookie_name(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = cookie_name.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RequestDriver for HttpDriver {
    async fn send(
        &self,
        path: &str,
        credentials: Option<&Credentials>,
        session: Option<&SessionToken>,
    ) -> Result<Observation, DriverError> {
        let url = format!("{}{}", self.base_url, path);
        let headers = request_headers(&self.cookie_name, credentials, session)?;

        let response = self.client.get(&url).headers(headers).send().await?;

        let observation = Observation {
            status: response.status(),
            session: session_token_from_headers(response.headers(), &self.cookie_name),
        };
        tracing::trace!(%url, status = %observation.status, "HTTP response");
        Ok(observation)
    }
}
