//! HTTP transport boundary.
//!
//! The pipeline only needs "GET this URL, give me status and body". Keeping
//! that behind [`HttpTransport`] lets tests substitute a scripted transport
//! and keeps TLS, pooling and redirects inside reqwest.

use crate::config::ApiConfig;
use crate::error::{Result, TmdbError, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Raw HTTP response as seen by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Performs a single GET and returns the raw response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &Url) -> std::result::Result<HttpResponse, TransportError>;
}

/// [`HttpTransport`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the default request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(ApiConfig::REQUEST_TIMEOUT)
    }

    /// Create a transport with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(ApiConfig::USER_AGENT)
            .build()
            .map_err(|e| TmdbError::Config {
                message: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> std::result::Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        debug!("Received status {} with {} bytes", status, body.len());

        Ok(HttpResponse { status, body })
    }
}

/// Classify a reqwest failure. The URL is stripped first because it carries
/// the API credential.
fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    let err = err.without_url();
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect {
            message: err.to_string(),
        }
    } else {
        TransportError::Other {
            message: err.to_string(),
        }
    }
}
