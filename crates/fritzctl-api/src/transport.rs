// HTTP transport for talking to the device.
//
// The session and action layers only need "GET this URL" and "POST this
// form body"; everything else (timeouts, user agent, status handling) lives
// here so tests can swap in a scripted transport.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Raw request/response seam used by [`Connector`](crate::Connector),
/// [`Session`](crate::Session) and [`ActionExecutor`](crate::ActionExecutor).
///
/// Implementations return the full response body as text. Any network
/// failure or non-success status must surface as [`Error::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a GET request and return the response body.
    async fn get(&self, url: &Url) -> Result<String, Error>;

    /// Send a POST with an `application/x-www-form-urlencoded` body.
    async fn post_form(&self, url: &Url, body: String) -> Result<String, Error>;
}

/// Shared transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: concat!("fritzctl/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| Error::Client(format!("failed to build HTTP client: {e}")))
    }
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport from a `TransportConfig`.
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
        })
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String, Error> {
        debug!(path = url.path(), "GET");

        let resp = self
            .http
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;

        Ok(resp.text().await?)
    }

    async fn post_form(&self, url: &Url, body: String) -> Result<String, Error> {
        debug!(path = url.path(), "POST");

        let resp = self
            .http
            .post(url.clone())
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(resp.text().await?)
    }
}
