//! The HTTP collaborator the extraction engine talks through.

use crate::config::ClientConfig;
use crate::error::TransportError;
use http::header::{self, HeaderMap, HeaderValue};
use reqwest::Url;
use serde_json::Value;
use std::future::Future;
use tracing::instrument;

/// Performs the two kinds of requests the scraper needs.
///
/// Implementations are expected to apply their own timeout and identifying headers; the client
/// only supplies URLs and bodies.
pub trait Transport {
    /// Fetches `url` and returns the body as text.
    fn get_text(&self, url: Url) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Posts `body` as JSON to `url` and decodes the JSON response.
    fn post_json(
        &self,
        url: Url,
        body: &Value,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

/// A [`Transport`] backed by [`reqwest`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a client carrying the configured timeout, User-Agent, and consent cookie.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&config.user_agent)?,
        );
        if let Some(cookie) = &config.consent_cookie {
            headers.insert(header::COOKIE, HeaderValue::from_str(cookie)?);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }

    fn check(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { status });
        }
        Ok(response)
    }
}

impl Transport for ReqwestTransport {
    #[instrument(skip(self, url), fields(url = %url))]
    async fn get_text(&self, url: Url) -> Result<String, TransportError> {
        let response = self.client.get(url).send().await?;
        let response = Self::check(response)?;
        let body = response.text().await?;
        tracing::trace!(bytes = body.len(), "page fetched");
        Ok(body)
    }

    #[instrument(skip(self, url, body), fields(url = %url))]
    async fn post_json(&self, url: Url, body: &Value) -> Result<Value, TransportError> {
        let response = self.client.post(url).json(body).send().await?;
        let response = Self::check(response)?;
        // decode through serde_json so malformed bodies surface as Decode, not Http
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
