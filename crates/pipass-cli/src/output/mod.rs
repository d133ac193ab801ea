//! Terminal output formatting and utilities.
//!
//! The report itself is the only thing written to stdout; status messages
//! and errors go to stderr so `pipass fetch --json` can be piped.

pub mod colors;
pub mod errors;
pub mod report;

use colors::ColorSupport;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: ColorSupport,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new(colors: ColorSupport) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &ColorSupport {
        &self.colors
    }

    /// Print rendered report text to stdout
    pub fn print(&self, text: &str) {
        print!("{}", text);
        if !text.ends_with('\n') {
            println!();
        }
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{}: {}", self.colors.yellow("warning"), message);
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new(ColorSupport::detect())
    }
}
