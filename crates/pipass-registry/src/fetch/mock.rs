//! In-memory fetcher for unit tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use async_trait::async_trait;

use pipass_core::error::PipassError;
use super::{FetchResponse, JsonFetcher};
use crate::RegistryResult;

/// Serves canned responses by URL and records every request
#[derive(Debug, Default)]
pub(crate) struct StaticFetcher {
    responses: HashMap<String, FetchResponse>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `status` and a JSON body
    pub(crate) fn with_json(mut self, url: &str, status: u16, body: serde_json::Value) -> Self {
        self.responses.insert(url.to_string(), FetchResponse { status, body: body.to_string() });
        self
    }

    /// Answer `url` with `status` and a raw body
    pub(crate) fn with_body(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(url.to_string(), FetchResponse { status, body: body.to_string() });
        self
    }

    /// URLs requested so far, in order
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl JsonFetcher for StaticFetcher {
    async fn get_json(&self, url: &str, _timeout: Duration) -> RegistryResult<FetchResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(response) => Ok(response.clone()),
            // Unknown URLs behave like an unreachable host
            None => Err(PipassError::transport_msg(format!("Could not connect to {}", url))),
        }
    }
}
