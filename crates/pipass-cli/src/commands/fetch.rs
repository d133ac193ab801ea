//! `pipass fetch`: look up a package and print its report.

use pipass_config::PipassToml;
use pipass_core::error::PipassResult;
use pipass_registry::{HttpFetcher, MetadataReporter, RegistryClient};
use tracing::debug;

use super::CommandContext;
use crate::output::report::{render_json, render_text, RenderOptions};

/// Arguments of the fetch command
#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub package: String,
    pub version: Option<String>,
    pub json: bool,
    pub no_extras: bool,
    pub files: bool,
}

/// Execute the fetch command
pub async fn execute(args: FetchArgs, ctx: &CommandContext) -> PipassResult<()> {
    let rendered = render_report(&args, ctx).await?;
    ctx.output.print(&rendered);
    Ok(())
}

/// Build the report and render it; nothing is printed on failure
pub async fn render_report(args: &FetchArgs, ctx: &CommandContext) -> PipassResult<String> {
    let reporter = build_reporter(&ctx.config)?;
    let report = reporter
        .build_report(&args.package, args.version.as_deref())
        .await?;

    if !report.version_requested && report.versions.is_empty() {
        ctx.output.warn(&format!("{} has no releases with uploaded files", report.name));
    }

    let options = RenderOptions {
        no_extras: args.no_extras,
        files: args.files,
    };
    debug!(json = args.json, ?options, "rendering report");

    if args.json {
        render_json(&report, options)
    } else {
        Ok(render_text(&report, ctx.output.colors(), options))
    }
}

/// Reporter wired to the configured registry
pub fn build_reporter(config: &PipassToml) -> PipassResult<MetadataReporter<HttpFetcher>> {
    let fetcher = HttpFetcher::with_user_agent(&config.registry.user_agent)?;
    let client = RegistryClient::with_fetcher(fetcher)
        .with_base_url(config.registry.url.as_str())
        .with_timeout(config.registry.timeout());

    Ok(MetadataReporter::new(client))
}
