//! Utility functions and helpers.
//!
//! Common functionality used across multiple pipass crates.

pub mod name;

// Re-export commonly used utilities
pub use name::{is_valid_name, normalize_name};
