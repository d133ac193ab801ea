//! # pipass-cli
//!
//! Command-line reporter for PyPI package metadata.
//!
//! This is the main entry point for the pipass tool. It parses arguments,
//! sets up logging and panic reporting, resolves configuration, and
//! dispatches to the command handlers. Every failure is turned into a message
//! on stderr and a process exit code here.

use std::collections::HashMap;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pipass_config::ColorChoice;
use pipass_core::error::{PipassError, PipassResult, EXIT_FAILURE};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::{colors::ColorSupport, errors::ErrorFormatter};

/// Report what PyPI knows about a package
#[derive(Parser, Debug)]
#[command(name = "pipass", version, about = "Report PyPI package metadata")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Registry base URL [default: https://pypi.org]
    #[arg(long, global = true, value_name = "URL")]
    pub registry: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// When to color output: auto, always or never
    #[arg(long, global = true, value_name = "WHEN")]
    pub color: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show metadata, release history and dependencies of a package
    #[command(disable_version_flag = true)]
    Fetch {
        /// Package name as published on the registry
        package: String,
        /// Describe this release instead of the latest one
        #[arg(long, value_name = "VERSION")]
        version: Option<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Hide dependencies that only apply to an extra
        #[arg(long)]
        no_extras: bool,
        /// List the release's distribution files
        #[arg(long)]
        files: bool,
    },
}

impl Cli {
    /// Flags that override configuration, keyed the way the config layer expects
    pub fn config_overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(registry) = &self.registry {
            overrides.insert("registry".to_string(), registry.clone());
        }
        if let Some(timeout) = self.timeout {
            overrides.insert("timeout".to_string(), timeout.to_string());
        }
        if let Some(color) = &self.color {
            overrides.insert("color".to_string(), color.clone());
        }
        overrides
    }

    /// Color choice known before configuration is loaded
    fn early_color_choice(&self) -> ColorChoice {
        self.color
            .clone()
            .or_else(|| std::env::var("PIPASS_COLOR").ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too
            let code = if e.use_stderr() { EXIT_FAILURE } else { 0 };
            // Nowhere left to report a failed write of the usage message
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting pipass v{}", env!("CARGO_PKG_VERSION"));

    let formatter = ErrorFormatter::new(ColorSupport::from_choice(cli.early_color_choice()));
    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", formatter.format_error(&e));
            ExitCode::from(e.exit_code())
        }
    }
}

fn run_cli(cli: Cli) -> PipassResult<()> {
    // One report at a time, so a single-threaded runtime is enough
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| PipassError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(cli.config_overrides()).await?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!(
            "pipass={level},pipass_core={level},pipass_config={level},pipass_registry={level}"
        )));

    // stdout carries the report, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("pipass encountered an unexpected error: {}", panic_info);
        eprintln!("pipass crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/pipass/pipass/issues");
        eprintln!("Error: {}", panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch_with_version() {
        let cli = Cli::try_parse_from([
            "pipass", "fetch", "requests", "--version", "2.30.0", "--no-extras", "-v",
        ]).unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Fetch { package, version, json, no_extras, files } => {
                assert_eq!(package, "requests");
                assert_eq!(version.as_deref(), Some("2.30.0"));
                assert!(!json);
                assert!(no_extras);
                assert!(!files);
            }
        }
    }

    #[test]
    fn test_global_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "pipass", "--registry", "https://mirror.example", "fetch", "flask", "--timeout", "3", "--color", "never",
        ]).unwrap();

        let overrides = cli.config_overrides();
        assert_eq!(overrides.get("registry").map(String::as_str), Some("https://mirror.example"));
        assert_eq!(overrides.get("timeout").map(String::as_str), Some("3"));
        assert_eq!(overrides.get("color").map(String::as_str), Some("never"));
        assert_eq!(cli.early_color_choice(), ColorChoice::Never);
    }

    #[test]
    fn test_no_flags_no_overrides() {
        let cli = Cli::try_parse_from(["pipass", "fetch", "flask"]).unwrap();
        assert!(cli.config_overrides().is_empty());
    }

    #[test]
    fn test_usage_errors_go_to_stderr() {
        let missing_package = Cli::try_parse_from(["pipass", "fetch"]).unwrap_err();
        assert!(missing_package.use_stderr());

        let bad_timeout = Cli::try_parse_from(["pipass", "fetch", "flask", "--timeout", "soon"]).unwrap_err();
        assert!(bad_timeout.use_stderr());

        let help = Cli::try_parse_from(["pipass", "--help"]).unwrap_err();
        assert!(!help.use_stderr());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
