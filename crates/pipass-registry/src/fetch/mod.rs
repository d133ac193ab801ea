//! Fetch collaborator: one HTTP GET, returning status and body
//!
//! The reporter only ever needs "give me the JSON at this URL". Keeping that
//! behind `JsonFetcher` lets tests swap the network for a map of canned
//! responses.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tracing::debug;

use pipass_core::error::PipassError;
use crate::RegistryResult;

/// Timeout applied to every request unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("pipass/", env!("CARGO_PKG_VERSION"));

/// Raw outcome of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, undecoded
    pub body: String,
}

impl FetchResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can GET a URL and hand back status and body
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Perform a single GET; fails only when no response was received
    async fn get_json(&self, url: &str, timeout: Duration) -> RegistryResult<FetchResponse>;
}

/// `reqwest`-backed fetcher used by the CLI
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// Underlying HTTP client
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default user agent
    pub fn new() -> RegistryResult<Self> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Create a fetcher that identifies itself as `user_agent`
    pub fn with_user_agent(user_agent: &str) -> RegistryResult<Self> {
        let client = ClientBuilder::new()
            .gzip(true)
            .user_agent(user_agent)
            .build()
            .map_err(|e| PipassError::transport(
                format!("Failed to create HTTP client: {}", e),
                e,
            ))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn get_json(&self, url: &str, timeout: Duration) -> RegistryResult<FetchResponse> {
        debug!(url, timeout_ms = timeout.as_millis() as u64, "GET");

        let response = self.client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| describe_request_error(url, timeout, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| describe_request_error(url, timeout, e))?;

        debug!(url, status, bytes = body.len(), "response received");
        Ok(FetchResponse { status, body })
    }
}

fn describe_request_error(url: &str, timeout: Duration, error: reqwest::Error) -> PipassError {
    let message = if error.is_timeout() {
        format!("Request to {} timed out after {}s", url, timeout.as_secs_f64())
    } else if error.is_connect() {
        format!("Could not connect to {}", url)
    } else {
        format!("Request to {} failed: {}", url, error)
    };
    PipassError::transport(message, error)
}

#[cfg(test)]
pub(crate) mod mock;
