//! Error types and result aliases for pipass operations.
//!
//! Provides a unified error type that covers every failure a report can end
//! with, along with the process exit code each one maps to.

use thiserror::Error;

/// Unified error type for all pipass operations
#[derive(Error, Debug)]
pub enum PipassError {
    // Registry errors
    #[error("Package '{name}' not found in registry")]
    PackageNotFound { name: String },

    #[error("Version '{version}' of package '{name}' not found in registry")]
    VersionNotFound { name: String, version: String },

    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Config errors
    #[error("Failed to parse pipass.toml: {message} at line {line}, column {column}")]
    TomlParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for pipass operations
pub type PipassResult<T> = Result<T, PipassError>;

/// Exit code for configuration, I/O and usage failures
pub const EXIT_FAILURE: u8 = 1;
/// Exit code for an unknown package name
pub const EXIT_PACKAGE_NOT_FOUND: u8 = 2;
/// Exit code for an unknown version of a known package
pub const EXIT_VERSION_NOT_FOUND: u8 = 3;
/// Exit code for network, HTTP and decoding failures
pub const EXIT_TRANSPORT: u8 = 4;

impl PipassError {
    /// Create a transport error from any error type
    pub fn transport<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create a transport error with no underlying cause
    pub fn transport_msg(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a serialization error from any error type
    pub fn serialization<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message,
            source: Box::new(source),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Process exit code reported by the CLI for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            PipassError::PackageNotFound { .. } => EXIT_PACKAGE_NOT_FOUND,
            PipassError::VersionNotFound { .. } => EXIT_VERSION_NOT_FOUND,
            PipassError::Transport { .. } => EXIT_TRANSPORT,
            _ => EXIT_FAILURE,
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            PipassError::PackageNotFound { .. } => {
                Some("Check the spelling on https://pypi.org; names contain only letters, digits, '.', '-' and '_'")
            },
            PipassError::VersionNotFound { .. } => {
                Some("Run without --version to list the versions the registry knows about")
            },
            PipassError::Transport { .. } => {
                Some("Check your internet connection, the registry URL and the timeout, then try again")
            },
            PipassError::TomlParse { .. } | PipassError::ConfigValidation { .. } => {
                Some("Fix pipass.toml or the matching PIPASS_* environment variable")
            },
            PipassError::Serialization { .. } => {
                Some("This is a bug in pipass; please report it")
            },
            PipassError::Io { .. } => {
                Some("Check that the path exists and is readable")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_exit_codes() {
        let not_found = PipassError::PackageNotFound { name: "nope".to_string() };
        assert_eq!(not_found.exit_code(), 2);

        let no_version = PipassError::VersionNotFound {
            name: "requests".to_string(),
            version: "0.0.1".to_string(),
        };
        assert_eq!(no_version.exit_code(), 3);

        assert_eq!(PipassError::transport_msg("boom").exit_code(), 4);

        let config = PipassError::ConfigValidation {
            field: "registry.url".to_string(),
            reason: "empty".to_string(),
        };
        assert_eq!(config.exit_code(), 1);
    }

    #[test]
    fn test_display_messages() {
        let err = PipassError::VersionNotFound {
            name: "requests".to_string(),
            version: "0.0.1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Version '0.0.1' of package 'requests' not found in registry"
        );

        let err = PipassError::TomlParse {
            message: "expected `=`".to_string(),
            line: 3,
            column: 7,
        };
        assert!(err.to_string().ends_with("at line 3, column 7"));
    }

    #[test]
    fn test_transport_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = PipassError::transport("request failed".to_string(), io);

        assert_eq!(err.source().map(|s| s.to_string()), Some("timed out".to_string()));
        assert!(PipassError::transport_msg("no cause").source().is_none());
    }

    #[test]
    fn test_suggestions() {
        assert!(PipassError::PackageNotFound { name: "x".to_string() }.suggestion().is_some());
        assert!(PipassError::transport_msg("x").suggestion().is_some());

        let io = PipassError::io(
            "read failed".to_string(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(io.suggestion().is_some());
    }

    #[test]
    fn test_serialization_error() {
        let cause = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad float");
        let err = PipassError::serialization("Failed to serialize report".to_string(), cause);

        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Serialization error: Failed to serialize report");
        assert_eq!(err.source().map(|s| s.to_string()), Some("bad float".to_string()));
        assert!(err.suggestion().is_some());
    }
}
