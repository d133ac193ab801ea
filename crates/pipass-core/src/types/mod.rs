//! Core data types for pipass reports.
//!
//! This module provides the types shared between the reporter and the CLI:
//! - Dependency specifications parsed from `Requires-Dist` strings
//! - The report view and its version/file rows

pub mod dependency;
pub mod report;

// Re-export all public types
pub use dependency::DependencySpec;
pub use report::{DistributionFile, ReleaseDate, ReportView};
