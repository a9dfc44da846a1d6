//! reqwest-backed probe and relay clients.
//!
//! Neither client keeps a cookie store, so requests never carry
//! credentials. Timeouts are the transport's own (`request_timeout`); the
//! resolver does not enforce any of its own.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use serde::Deserialize;
use url::Url;

use super::traits::{ContentProbe, MarkupRelay};
use crate::{LinkPeekError, Result};

/// Default relay endpoint. Expects `?url=<target>` and answers
/// `{"contents": "<raw markup>", ...}`.
pub const DEFAULT_RELAY_URL: &str = "https://api.allorigins.win/get";

/// Default transport timeout for probe and relay requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("linkpeek/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client.
pub fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| LinkPeekError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Content-type probe issuing `HEAD` requests.
///
/// The status code is ignored: only the `Content-Type` header matters, and
/// its absence is reported as `None`.
#[derive(Clone)]
pub struct HttpProbe {
    http: Client,
}

impl HttpProbe {
    /// Create a probe with its own client and the given timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(http_client(timeout)?))
    }

    /// Create a probe sharing an existing client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ContentProbe for HttpProbe {
    fn name(&self) -> &str {
        "http-head"
    }

    async fn content_type(&self, url: &Url) -> Result<Option<String>> {
        let response = self
            .http
            .head(url.clone())
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| LinkPeekError::Http(e.to_string()))?;

        Ok(response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()))
    }
}

/// Relay response body.
#[derive(Debug, Deserialize)]
struct RelayPayload {
    #[serde(default)]
    contents: Option<String>,
}

/// Client for a `GET <relay>?url=<target>` markup relay.
#[derive(Clone)]
pub struct RelayClient {
    http: Client,
    base_url: String,
}

impl RelayClient {
    /// Create a relay client for `base_url` with its own HTTP client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(http_client(timeout)?, base_url))
    }

    /// Create a relay client sharing an existing HTTP client (for testing with wiremock).
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// The relay endpoint.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MarkupRelay for RelayClient {
    fn name(&self) -> &str {
        "relay"
    }

    async fn fetch_markup(&self, url: &Url) -> Result<String> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("url", url.as_str())])
            .send()
            .await
            .map_err(|e| LinkPeekError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LinkPeekError::RelayStatus {
                status: status.as_u16(),
                message,
            });
        }

        let payload: RelayPayload = response
            .json()
            .await
            .map_err(|e| LinkPeekError::Http(format!("invalid relay payload: {e}")))?;

        payload
            .contents
            .filter(|contents| !contents.is_empty())
            .ok_or(LinkPeekError::EmptyPayload)
    }
}
