//! The seam between the list/member operations and the network.
//!
//! [`Transport`] executes a single [`RequestMetadata`] and hands back a
//! [`RawResponse`]. [`HttpTransport`] is the default implementation on top of
//! `reqwest`; tests and embedders can plug in their own.

use crate::{metadata::RequestMetadata, Config, Error, RawResponse, Result};
use async_trait::async_trait;
use http::HeaderMap;
use std::time::{Duration, Instant};
use url::Url;

/// Executes API requests.
///
/// Implementations perform exactly one attempt per call. They must not
/// interpret the status code; a 404 is a successful execution that returns a
/// `RawResponse` with status 404. Failures to reach the server are reported
/// with [`Error::transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the response as received.
    async fn execute(&self, request: &RequestMetadata) -> Result<RawResponse>;
}

/// The default `reqwest` based transport.
///
/// Authenticates with HTTP basic auth (`api` / API key) and joins request
/// paths onto the configured base URL, keeping its version prefix.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    config: Config,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Creates a transport with no default headers and no timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_options(config, HeaderMap::new(), None)
    }

    pub(crate) fn with_options(
        config: Config,
        default_headers: HeaderMap,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            http_client,
            config,
            default_headers,
            timeout,
        })
    }

    /// Builds the full URL for a request.
    fn url_for(&self, metadata: &RequestMetadata) -> Url {
        let mut url = self.config.base_url().clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}{}", base_path, metadata.path));

        if !metadata.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &metadata.query_params {
                pairs.append_pair(key, value);
            }
        }

        url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, metadata: &RequestMetadata) -> Result<RawResponse> {
        let start_time = Instant::now();
        let url = self.url_for(metadata);

        tracing::debug!(
            method = %metadata.method,
            url = %url,
            "Executing HTTP request"
        );

        let mut request = self
            .http_client
            .request(metadata.method.clone(), url)
            .basic_auth("api", Some(self.config.api_key()));

        for (name, value) in &self.default_headers {
            request = request.header(name, value);
        }

        for (name, value) in &metadata.headers {
            request = request.header(name, value);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        if let Some(form) = &metadata.form {
            request = request.form(form);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        let latency = start_time.elapsed();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            method = %metadata.method,
            path = %metadata.path,
            "Received HTTP response"
        );

        Ok(RawResponse {
            status,
            headers,
            body,
            latency,
        })
    }
}
