//! Configuration parsing for pipass
//!
//! This crate handles parsing and validation of `pipass.toml` files and
//! layers them with environment variables and command-line flags into the
//! settings the CLI runs with.

pub mod toml;
pub mod merge;

// Re-export main types
pub use crate::toml::{PipassToml, RegistrySection, OutputSection, ColorChoice};
pub use merge::{ConfigLoader, ConfigLayering, ConfigSource};

use pipass_core::error::PipassError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, PipassError>;
