//! # pipass-core
//!
//! Core types and utilities shared across all pipass crates.
//!
//! This crate provides:
//! - `PipassError` for unified error handling and exit code mapping
//! - `DependencySpec` for displaying declared requirement strings
//! - `ReportView` and its row types, the output of the metadata reporter
//! - Package name helpers following PEP 503 / PEP 508
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (DependencySpec, ReportView, etc.)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{PipassError, PipassResult};
pub use types::{DependencySpec, DistributionFile, ReleaseDate, ReportView};
