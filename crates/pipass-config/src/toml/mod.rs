//! pipass.toml configuration parsing and serialization

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use pipass_core::error::PipassError;
use crate::ConfigResult;

/// Registry used when nothing else is configured
pub const DEFAULT_REGISTRY_URL: &str = "https://pypi.org";

/// Seconds before a request is abandoned
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Longest timeout accepted from any configuration layer
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Complete pipass.toml configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipassToml {
    /// Registry access settings
    pub registry: RegistrySection,

    /// Terminal output settings
    pub output: OutputSection,
}

/// `[registry]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct RegistrySection {
    /// Base URL of the registry, e.g. `https://pypi.org`
    pub url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

/// `[output]` section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    /// When to color terminal output
    pub color: ColorChoice,
}

/// Color mode for terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color when both streams are terminals and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            url: DEFAULT_REGISTRY_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("pipass/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl RegistrySection {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            other => Err(format!("expected one of auto, always, never; got '{}'", other)),
        }
    }
}

impl fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorChoice::Auto => "auto",
            ColorChoice::Always => "always",
            ColorChoice::Never => "never",
        };
        f.write_str(name)
    }
}

/// Parse one configuration file into a raw table, keeping only set keys.
///
/// Layers are merged as tables so a key missing from a file never masks the
/// same key in a lower layer.
pub fn parse_layer(content: &str) -> ConfigResult<toml::Table> {
    // First pass with toml_edit for located syntax errors
    content.parse::<toml_edit::DocumentMut>()
        .map_err(|e| located_error(content, e.message(), e.span()))?;

    let table: toml::Table = toml::from_str(content)
        .map_err(|e| located_error(content, e.message(), e.span()))?;

    // Type-check now so errors point at the file that caused them
    table_to_config(table.clone())
        .map_err(|e| located_error(content, e.message(), e.span()))?;

    Ok(table)
}

/// Parse TOML string to a validated PipassToml configuration
pub fn parse_pipass_toml(content: &str) -> ConfigResult<PipassToml> {
    let table = parse_layer(content)?;
    let config = table_to_config(table)
        .map_err(|e| located_error(content, e.message(), e.span()))?;

    validate_config(&config)?;

    Ok(config)
}

/// Deserialize a (possibly merged) table into a configuration
pub fn table_to_config(table: toml::Table) -> Result<PipassToml, toml::de::Error> {
    toml::Value::Table(table).try_into()
}

/// Serialize PipassToml to TOML string
pub fn serialize_pipass_toml(config: &PipassToml) -> ConfigResult<String> {
    toml::to_string_pretty(config)
        .map_err(|e| PipassError::ConfigValidation {
            field: "config".to_string(),
            reason: format!("TOML serialization error: {}", e),
        })
}

/// Validate configuration values
pub fn validate_config(config: &PipassToml) -> ConfigResult<()> {
    validate_registry_url(&config.registry.url)?;

    if config.registry.timeout_secs == 0 || config.registry.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(PipassError::ConfigValidation {
            field: "registry.timeout-secs".to_string(),
            reason: format!(
                "must be between 1 and {} seconds, got {}",
                MAX_TIMEOUT_SECS, config.registry.timeout_secs
            ),
        });
    }

    if config.registry.user_agent.trim().is_empty() {
        return Err(PipassError::ConfigValidation {
            field: "registry.user-agent".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    Ok(())
}

/// Load and parse pipass.toml from file path as a raw layer
pub async fn load_from_file(path: &camino::Utf8Path) -> ConfigResult<toml::Table> {
    let content = tokio::fs::read_to_string(path).await
        .map_err(|e| PipassError::io(format!("Failed to read {}", path), e))?;

    parse_layer(&content)
        .map_err(|e| match e {
            PipassError::TomlParse { message, line, column } => PipassError::TomlParse {
                message: format!("in file {}: {}", path, message),
                line,
                column,
            },
            other => other,
        })
}

/// Registry URLs must be absolute http(s) URLs
fn validate_registry_url(raw: &str) -> ConfigResult<()> {
    let parsed = url::Url::parse(raw).map_err(|e| PipassError::ConfigValidation {
        field: "registry.url".to_string(),
        reason: format!("'{}' is not a valid URL: {}", raw, e),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PipassError::ConfigValidation {
            field: "registry.url".to_string(),
            reason: format!("'{}' must use http or https", raw),
        });
    }

    Ok(())
}

fn located_error(content: &str, message: &str, span: Option<std::ops::Range<usize>>) -> PipassError {
    let (line, column) = span
        .map(|span| line_column(content, span.start))
        .unwrap_or((0, 0));

    PipassError::TomlParse {
        message: message.trim().to_string(),
        line,
        column,
    }
}

/// 1-based line and column of a byte offset
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = content.get(..offset).unwrap_or(content);
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0) + 1;
    (line, column)
}
