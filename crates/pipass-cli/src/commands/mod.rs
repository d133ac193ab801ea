//! Command implementations and dispatch logic.
//!
//! Each command is an async function taking the parsed arguments and a
//! `CommandContext` holding the resolved configuration.

use std::collections::HashMap;

use camino::Utf8PathBuf;
use pipass_config::{ConfigLayering, ConfigLoader, ConfigSource, PipassToml};
use pipass_core::error::{PipassError, PipassResult};
use tracing::{debug, info};

pub mod fetch;

#[cfg(test)]
mod tests;

use crate::output::{colors::ColorSupport, OutputHandler};
use crate::Commands;

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub config: PipassToml,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Resolve configuration for the current directory and build the context
    pub async fn new(cli_overrides: HashMap<String, String>) -> PipassResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| PipassError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| PipassError::ConfigValidation {
            field: "cwd".to_string(),
            reason: format!("current directory is not valid UTF-8: {}", e),
        })?;

        let loader = ConfigLoader::new(cwd.clone());
        let (config, sources) = loader
            .load(ConfigLayering::collect_env_overrides(), cli_overrides)
            .await?;
        log_sources(&sources);

        Ok(Self::with_config(cwd, config))
    }

    /// Build a context from an already resolved configuration
    pub fn with_config(cwd: Utf8PathBuf, config: PipassToml) -> Self {
        let output = OutputHandler::new(ColorSupport::from_choice(config.output.color));
        Self { cwd, config, output }
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> PipassResult<()> {
    match command {
        Commands::Fetch { package, version, json, no_extras, files } => {
            info!("Fetching metadata for {} (version: {:?})", package, version);
            let args = fetch::FetchArgs { package, version, json, no_extras, files };
            fetch::execute(args, ctx).await
        }
    }
}

fn log_sources(sources: &[ConfigSource]) {
    for source in sources {
        match source {
            ConfigSource::Defaults => debug!("config: built-in defaults"),
            ConfigSource::Global(path) => debug!("config: global file {}", path),
            ConfigSource::Project(path) => debug!("config: project file {}", path),
            ConfigSource::Environment(key) => debug!("config: environment variable {}", key),
            ConfigSource::CommandLine => debug!("config: command-line flags"),
        }
    }
}
