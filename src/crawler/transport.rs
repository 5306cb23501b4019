//! HTTP transport
//!
//! This module owns the network side of a page fetch:
//! - Building the blocking HTTP client with the crawler's user agent
//! - Issuing GET requests with a per-request timeout
//! - Classifying transport failures (timeout, connect, other)
//!
//! The [`Transport`] trait is the seam the page fetcher talks to, so the
//! worker pool can be driven without a network.

use crate::config::SourceConfig;
use reqwest::blocking::Client;
use std::time::Duration;
use thiserror::Error;

/// Response of a completed request, whatever its status
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body
    pub body: String,
}

/// Failure to obtain any HTTP response
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Blocking page transport
pub trait Transport: Send + Sync {
    /// Performs a GET request, giving up after `timeout`
    fn fetch(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError>;
}

/// Builds the blocking HTTP client used by [`HttpTransport`]
///
/// # Arguments
///
/// * `config` - The page source configuration (user agent)
/// * `timeout` - Default request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &SourceConfig, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Transport`] backed by a blocking reqwest client
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a transport with a fresh client
    pub fn from_config(config: &SourceConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config, timeout)?))
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|e| classify_error(e, timeout))?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(timeout)
            } else {
                TransportError::Body(e.to_string())
            }
        })?;

        Ok(HttpResponse { status, body })
    }
}

/// Maps a reqwest error onto the transport error taxonomy
fn classify_error(error: reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(timeout)
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Request(error.to_string())
    }
}
