//! Rendering of a `ReportView` as labeled text or JSON

use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use pipass_core::error::{PipassError, PipassResult};
use pipass_core::types::ReportView;

use super::colors::ColorSupport;

/// What to include beyond the always-present lines
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Drop dependencies gated on an `extra` marker
    pub no_extras: bool,
    /// Include the selected release's distribution files
    pub files: bool,
}

/// Labeled plain-text report
pub fn render_text(report: &ReportView, colors: &ColorSupport, options: RenderOptions) -> String {
    let mut out = String::new();
    let label = |name: &str| colors.bold(&format!("{}:", name));

    let _ = writeln!(out, "{} {}", label("Name"), report.name);
    let _ = writeln!(out, "{} {}", label("Latest Version"), report.latest_version);
    if report.version_requested {
        let _ = writeln!(out, "{} {}", label("Version"), report.version);
    }
    let _ = writeln!(out, "{} {}", label("Summary"), report.summary.as_deref().unwrap_or(""));

    let optional = [
        ("License", &report.license),
        ("Home Page", &report.home_page),
        ("Requires Python", &report.requires_python),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            let _ = writeln!(out, "{} {}", label(name), value);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", label("Versions"));
    for release in &report.versions {
        let version = if release.version == report.version {
            colors.green(&release.version)
        } else {
            release.version.clone()
        };
        let mut line = format!("  {} — {}", version, iso_8601(&release.released));
        if release.yanked {
            line.push(' ');
            line.push_str(&colors.yellow("(yanked)"));
        }
        let _ = writeln!(out, "{}", line);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", label("Dependencies"));
    let dependencies: Vec<_> = report
        .dependencies
        .iter()
        .filter(|dep| !(options.no_extras && dep.is_extra()))
        .collect();
    if dependencies.is_empty() {
        let _ = writeln!(out, "  {}", colors.dim("(none)"));
    }
    for dep in dependencies {
        let _ = writeln!(out, "  {}", dep);
    }

    if options.files {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", label("Files"));
        if report.files.is_empty() {
            let _ = writeln!(out, "  {}", colors.dim("(none)"));
        }
        for file in &report.files {
            let mut line = format!("  {} ({}, {} bytes", file.filename, file.packagetype, file.size);
            if let Some(uploaded) = &file.uploaded {
                let _ = write!(line, ", uploaded {}", iso_8601(uploaded));
            }
            line.push(')');
            if file.yanked {
                line.push(' ');
                line.push_str(&colors.yellow("(yanked)"));
            }
            let _ = writeln!(out, "{}", line);
        }
    }

    out
}

/// Pretty-printed JSON of the report, filtered like the text form
pub fn render_json(report: &ReportView, options: RenderOptions) -> PipassResult<String> {
    let mut view = report.clone();
    if options.no_extras {
        view.dependencies.retain(|dep| !dep.is_extra());
    }
    if !options.files {
        view.files.clear();
    }

    serde_json::to_string_pretty(&view)
        .map_err(|e| PipassError::serialization("Failed to serialize report".to_string(), e))
}

fn iso_8601(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}
