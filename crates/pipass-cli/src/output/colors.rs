//! Terminal color support detection and formatting.
//!
//! Provides automatic color detection that respects NO_COLOR environment variable
//! and TTY detection for consistent output across different environments.

use std::env;
use std::io::{self, IsTerminal};

use pipass_config::ColorChoice;

/// Color support detection and formatting
#[derive(Debug, Clone, Copy)]
pub struct ColorSupport {
    enabled: bool,
}

impl ColorSupport {
    /// Detect color support automatically
    pub fn detect() -> Self {
        let enabled = Self::should_use_colors();
        Self { enabled }
    }

    /// Force enable colors
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Force disable colors
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Resolve a configured color choice
    pub fn from_choice(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => Self::detect(),
            ColorChoice::Always => Self::enabled(),
            ColorChoice::Never => Self::disabled(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Check if colors should be used
    fn should_use_colors() -> bool {
        // Respect NO_COLOR environment variable
        if env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            return false;
        }

        // Check if we're in a TTY
        io::stderr().is_terminal() && io::stdout().is_terminal()
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }
}

impl ColorSupport {
    /// Format text in bold
    pub fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }

    /// Format text in green
    pub fn green(&self, text: &str) -> String {
        self.paint("32", text)
    }

    /// Format text in yellow
    pub fn yellow(&self, text: &str) -> String {
        self.paint("33", text)
    }

    /// Format text in red
    pub fn red(&self, text: &str) -> String {
        self.paint("31", text)
    }

    /// Format text as dim/gray
    pub fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_colors_leave_text_alone() {
        let colors = ColorSupport::disabled();
        assert_eq!(colors.red("error"), "error");
        assert_eq!(colors.bold("Name"), "Name");
    }

    #[test]
    fn test_enabled_colors_wrap_text() {
        let colors = ColorSupport::enabled();
        assert_eq!(colors.green("ok"), "\x1b[32mok\x1b[0m");
        assert_eq!(colors.dim("x"), "\x1b[2mx\x1b[0m");
    }

    #[test]
    fn test_from_choice() {
        assert!(ColorSupport::from_choice(ColorChoice::Always).is_enabled());
        assert!(!ColorSupport::from_choice(ColorChoice::Never).is_enabled());
    }
}
