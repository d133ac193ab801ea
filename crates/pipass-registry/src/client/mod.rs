//! Registry client: URL layout and status mapping for the PyPI JSON API

use std::time::Duration;
use tracing::debug;

use pipass_core::error::PipassError;
use pipass_core::utils::normalize_name;
use crate::api::PackageRecord;
use crate::fetch::{FetchResponse, HttpFetcher, JsonFetcher, DEFAULT_TIMEOUT};
use crate::RegistryResult;

/// Public PyPI
pub const DEFAULT_REGISTRY_URL: &str = "https://pypi.org";

/// Client for the registry's package-info endpoints
#[derive(Debug, Clone)]
pub struct RegistryClient<F = HttpFetcher> {
    /// Fetch collaborator performing the actual GETs
    fetcher: F,
    /// Base registry URL, without trailing slash
    base_url: String,
    /// Per-request timeout
    timeout: Duration,
}

impl RegistryClient<HttpFetcher> {
    /// Create a client for public PyPI over HTTP
    pub fn new() -> RegistryResult<Self> {
        Ok(Self::with_fetcher(HttpFetcher::new()?))
    }
}

impl<F: JsonFetcher> RegistryClient<F> {
    /// Create a client on top of any fetcher
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at another registry (mirror, test server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bound every request by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `<base>/pypi/<name>/json`
    pub fn package_url(&self, name: &str) -> String {
        format!("{}/pypi/{}/json", self.base_url, normalize_name(name))
    }

    /// `<base>/pypi/<name>/<version>/json`
    pub fn release_url(&self, name: &str, version: &str) -> String {
        format!("{}/pypi/{}/{}/json", self.base_url, normalize_name(name), version.trim())
    }

    /// Fetch the canonical document: latest `info` plus every release
    pub async fn fetch_package(&self, name: &str) -> RegistryResult<PackageRecord> {
        let url = self.package_url(name);
        let response = self.fetcher.get_json(&url, self.timeout).await?;

        if response.status == 404 {
            return Err(PipassError::PackageNotFound { name: name.to_string() });
        }
        decode(&url, response)
    }

    /// Fetch the version-scoped document: `info` describes `version`
    pub async fn fetch_release(&self, name: &str, version: &str) -> RegistryResult<PackageRecord> {
        let url = self.release_url(name, version);
        let response = self.fetcher.get_json(&url, self.timeout).await?;

        if response.status == 404 {
            return Err(PipassError::VersionNotFound {
                name: name.to_string(),
                version: version.to_string(),
            });
        }
        decode(&url, response)
    }
}

/// Turn a non-404 response into a record or a transport error
fn decode(url: &str, response: FetchResponse) -> RegistryResult<PackageRecord> {
    if !response.is_success() {
        return Err(PipassError::transport_msg(format!(
            "Registry returned status {} for {}",
            response.status, url
        )));
    }

    let record: PackageRecord = serde_json::from_str(&response.body)
        .map_err(|e| PipassError::transport(
            format!("Failed to parse registry response from {}: {}", url, e),
            e,
        ))?;

    debug!(url, releases = record.releases.len(), "decoded package record");
    Ok(record)
}
