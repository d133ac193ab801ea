//! Configuration layering, discovery, and environment overrides

use std::collections::HashMap;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use pipass_core::error::PipassError;
use crate::ConfigResult;
use crate::toml::{table_to_config, validate_config, ColorChoice, PipassToml};

/// Project configuration file name, searched upward from the working directory
pub const PROJECT_CONFIG_FILE: &str = "pipass.toml";

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "PIPASS_";

/// Main configuration loading interface
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Directory the project search starts from
    cwd: Utf8PathBuf,
    /// Location of the user-wide config file, if there is a home directory
    global_path: Option<Utf8PathBuf>,
}

/// Configuration layering and merging
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLayering;

/// Where a piece of the effective configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Built-in defaults
    Defaults,
    /// Global config file
    Global(Utf8PathBuf),
    /// Project pipass.toml file
    Project(Utf8PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

impl ConfigLoader {
    /// Create a loader rooted at `cwd`, using `~/.pipass/config.toml` as the global file
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self {
            cwd,
            global_path: default_global_path(),
        }
    }

    /// Replace (or disable) the global config location
    pub fn with_global_path(mut self, path: Option<Utf8PathBuf>) -> Self {
        self.global_path = path;
        self
    }

    pub fn cwd(&self) -> &Utf8Path {
        &self.cwd
    }

    /// Find configuration file in project (walks up directory tree)
    pub fn resolve_config_path(&self, filename: &str) -> Option<Utf8PathBuf> {
        let mut current = Some(self.cwd.as_path());

        while let Some(dir) = current {
            let candidate = dir.join(filename);
            if candidate.is_file() {
                return Some(candidate);
            }
            current = dir.parent();
        }

        None
    }

    /// Load the nearest pipass.toml as a raw layer
    pub async fn load_project_config(&self) -> ConfigResult<Option<(toml::Table, ConfigSource)>> {
        match self.resolve_config_path(PROJECT_CONFIG_FILE) {
            Some(path) => {
                debug!(path = %path, "loading project config");
                let table = crate::toml::load_from_file(&path).await?;
                Ok(Some((table, ConfigSource::Project(path))))
            }
            None => Ok(None),
        }
    }

    /// Load the global config as a raw layer
    pub async fn load_global_config(&self) -> ConfigResult<Option<(toml::Table, ConfigSource)>> {
        let Some(path) = self.global_path.as_ref().filter(|p| p.is_file()) else {
            return Ok(None);
        };

        debug!(path = %path, "loading global config");
        let table = crate::toml::load_from_file(path).await?;
        Ok(Some((table, ConfigSource::Global(path.clone()))))
    }

    /// Resolve the effective configuration from every layer.
    ///
    /// Returns the validated configuration and the sources that contributed
    /// to it, lowest priority first.
    pub async fn load(
        &self,
        env_overrides: HashMap<String, String>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<(PipassToml, Vec<ConfigSource>)> {
        let mut sources = vec![ConfigSource::Defaults];

        let global = self.load_global_config().await?.map(|(table, source)| {
            sources.push(source);
            table
        });
        let project = self.load_project_config().await?.map(|(table, source)| {
            sources.push(source);
            table
        });

        let mut env_keys: Vec<&String> = env_overrides
            .keys()
            .filter(|key| is_known_env_key(key))
            .collect();
        env_keys.sort();
        sources.extend(env_keys.into_iter().map(|key| ConfigSource::Environment(key.clone())));

        if !cli_overrides.is_empty() {
            sources.push(ConfigSource::CommandLine);
        }

        let config = ConfigLayering::merge_configs(global, project, env_overrides, cli_overrides)?;
        Ok((config, sources))
    }
}

impl ConfigLayering {
    /// Merge configuration layers and validate the result.
    ///
    /// Files are merged key by key, the project file winning over the global
    /// one; environment and CLI overrides are applied on top, in that order.
    pub fn merge_configs(
        global_config: Option<toml::Table>,
        project_config: Option<toml::Table>,
        env_overrides: HashMap<String, String>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<PipassToml> {
        let mut merged = global_config.unwrap_or_default();
        if let Some(project) = project_config {
            merge_tables(&mut merged, project);
        }

        let mut config = table_to_config(merged).map_err(|e| PipassError::ConfigValidation {
            field: "config".to_string(),
            reason: e.message().trim().to_string(),
        })?;

        Self::apply_env_overrides(&mut config, &env_overrides)?;

        // Highest priority
        Self::apply_cli_overrides(&mut config, &cli_overrides)?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(config: &mut PipassToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "PIPASS_REGISTRY_URL" => {
                    config.registry.url = value.trim().to_string();
                }
                "PIPASS_TIMEOUT_SECS" => {
                    config.registry.timeout_secs = parse_timeout(key, value)?;
                }
                "PIPASS_USER_AGENT" => {
                    config.registry.user_agent = value.clone();
                }
                "PIPASS_COLOR" => {
                    config.output.color = parse_color(key, value)?;
                }
                other => {
                    debug!(key = other, "ignoring unknown environment override");
                }
            }
        }

        Ok(())
    }

    /// Apply CLI flag overrides
    pub fn apply_cli_overrides(config: &mut PipassToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "registry" => {
                    config.registry.url = value.trim().to_string();
                }
                "timeout" => {
                    config.registry.timeout_secs = parse_timeout("--timeout", value)?;
                }
                "color" => {
                    config.output.color = parse_color("--color", value)?;
                }
                other => {
                    debug!(key = other, "ignoring unknown CLI override");
                }
            }
        }

        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}

/// Overlay `overlay` onto `base`; nested tables merge, everything else replaces
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn is_known_env_key(key: &str) -> bool {
    matches!(
        key,
        "PIPASS_REGISTRY_URL" | "PIPASS_TIMEOUT_SECS" | "PIPASS_USER_AGENT" | "PIPASS_COLOR"
    )
}

fn parse_timeout(field: &str, value: &str) -> ConfigResult<u64> {
    value.trim().parse().map_err(|_| PipassError::ConfigValidation {
        field: field.to_string(),
        reason: format!("expected a whole number of seconds, got '{}'", value),
    })
}

fn parse_color(field: &str, value: &str) -> ConfigResult<ColorChoice> {
    value.parse().map_err(|reason| PipassError::ConfigValidation {
        field: field.to_string(),
        reason,
    })
}

fn default_global_path() -> Option<Utf8PathBuf> {
    let home = dirs::home_dir()?;
    match Utf8PathBuf::try_from(home) {
        Ok(home) => Some(home.join(".pipass").join("config.toml")),
        Err(e) => {
            debug!(error = %e, "home directory is not UTF-8; skipping global config");
            None
        }
    }
}
