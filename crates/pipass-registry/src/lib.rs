//! PyPI registry client for pipass
//!
//! This crate provides the fetch collaborator used to talk to the PyPI JSON
//! API, typed views of the documents it returns, and the metadata reporter
//! that turns those documents into a `ReportView`.

pub mod api;
pub mod client;
pub mod fetch;
pub mod report;

// Re-export main types
pub use api::{Digests, PackageInfo, PackageRecord, ReleaseFile};
pub use client::{RegistryClient, DEFAULT_REGISTRY_URL};
pub use fetch::{FetchResponse, HttpFetcher, JsonFetcher, DEFAULT_TIMEOUT};
pub use report::MetadataReporter;

use pipass_core::error::PipassError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, PipassError>;
