//! Error message formatting with actionable suggestions.
//!
//! Provides user-friendly error formatting that includes context,
//! suggestions for fixes, and the chain of underlying causes.

use pipass_core::error::PipassError;
use super::colors::ColorSupport;
use std::error::Error;

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    /// Create a new error formatter
    pub fn new(colors: ColorSupport) -> Self {
        Self { colors }
    }

    /// Format an error with context and suggestions
    pub fn format_error(&self, error: &PipassError) -> String {
        let mut output = String::new();

        // Main error message
        output.push_str(&self.colors.red("error"));
        output.push_str(": ");
        output.push_str(&error.to_string());

        // Add source chain if available
        let mut source = error.source();
        while let Some(err) = source {
            output.push('\n');
            output.push_str(&self.colors.dim("caused by"));
            output.push_str(": ");
            output.push_str(&err.to_string());
            source = err.source();
        }

        // Add suggestion if available
        if let Some(suggestion) = error.suggestion() {
            output.push('\n');
            output.push_str(&self.colors.dim("help"));
            output.push_str(": ");
            output.push_str(suggestion);
        }

        output
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new(ColorSupport::detect())
    }
}
