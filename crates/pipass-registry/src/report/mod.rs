//! Metadata reporter: registry documents in, `ReportView` out
//!
//! The canonical document carries the full release set and the latest
//! `info`. Its `requires_dist` only describes the latest release, so a report
//! for an explicit version also reads the version-scoped document.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use pipass_core::error::PipassError;
use pipass_core::types::{DependencySpec, DistributionFile, ReleaseDate, ReportView};
use pipass_core::utils::is_valid_name;
use crate::api::{PackageInfo, ReleaseFile};
use crate::client::RegistryClient;
use crate::fetch::{HttpFetcher, JsonFetcher};
use crate::RegistryResult;

/// Builds reports from registry lookups
#[derive(Debug, Clone)]
pub struct MetadataReporter<F = HttpFetcher> {
    client: RegistryClient<F>,
}

impl<F: JsonFetcher> MetadataReporter<F> {
    /// Create a reporter on top of a configured client
    pub fn new(client: RegistryClient<F>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RegistryClient<F> {
        &self.client
    }

    /// Look up `package_name` and describe `version`, or the latest release.
    ///
    /// Fails with `PackageNotFound` for unknown names (a string that cannot
    /// be a package name is answered without asking the registry), `VersionNotFound` when
    /// `version` is not a key of the release set, and `Transport` when the
    /// registry cannot be read. Nothing is substituted on failure.
    pub async fn build_report(
        &self,
        package_name: &str,
        version: Option<&str>,
    ) -> RegistryResult<ReportView> {
        let name = package_name.trim();
        if !is_valid_name(name) {
            debug!(package = package_name, "not a valid package name; skipping lookup");
            return Err(PipassError::PackageNotFound { name: package_name.to_string() });
        }

        info!(package = name, version = ?version, "building report");

        let record = self.client.fetch_package(name).await?;
        let latest = record
            .info()
            .ok_or_else(|| PipassError::PackageNotFound { name: name.to_string() })?;

        let selected = match version {
            Some(requested) => {
                let requested = requested.trim();
                if !record.releases.contains_key(requested) {
                    return Err(PipassError::VersionNotFound {
                        name: name.to_string(),
                        version: requested.to_string(),
                    });
                }

                let scoped = self.client.fetch_release(name, requested).await?;
                let scoped_info = scoped
                    .info()
                    .cloned()
                    .ok_or_else(|| PipassError::PackageNotFound { name: name.to_string() })?;
                Selected {
                    version: requested.to_string(),
                    info: scoped_info,
                    fallback_files: scoped.urls,
                }
            }
            None => Selected {
                version: latest.version.clone(),
                info: latest.clone(),
                fallback_files: record.urls.clone(),
            },
        };

        let files = record
            .releases
            .get(&selected.version)
            .filter(|files| !files.is_empty())
            .unwrap_or(&selected.fallback_files);

        let report = ReportView {
            name: latest.name.clone(),
            version: selected.version.clone(),
            latest_version: latest.version.clone(),
            version_requested: version.is_some(),
            summary: non_blank(&selected.info.summary),
            home_page: non_blank(&selected.info.home_page),
            license: non_blank(&selected.info.license),
            requires_python: non_blank(&selected.info.requires_python),
            versions: release_dates(&record.releases),
            dependencies: selected
                .info
                .requires_dist
                .iter()
                .map(|raw| DependencySpec::parse(raw))
                .collect(),
            files: distribution_files(files),
        };

        debug!(
            package = %report.name,
            version = %report.version,
            versions = report.versions.len(),
            dependencies = report.dependencies.len(),
            "report built"
        );
        Ok(report)
    }
}

/// Version the report describes and the metadata that goes with it
struct Selected {
    version: String,
    info: PackageInfo,
    fallback_files: Vec<ReleaseFile>,
}

/// Pair each release with its earliest upload, oldest first.
///
/// Releases without any dated file are left out; ties are ordered by
/// version string.
pub fn release_dates(releases: &HashMap<String, Vec<ReleaseFile>>) -> Vec<ReleaseDate> {
    let mut dates: Vec<ReleaseDate> = releases
        .iter()
        .filter_map(|(version, files)| {
            let released = files.iter().filter_map(ReleaseFile::uploaded_at).min();
            if released.is_none() && !files.is_empty() {
                warn!(version = %version, "release has files but no readable upload time");
            }
            Some(ReleaseDate {
                version: version.clone(),
                released: released?,
                yanked: files.iter().all(|f| f.yanked),
            })
        })
        .collect();

    dates.sort_by(|a, b| {
        a.released
            .cmp(&b.released)
            .then_with(|| a.version.cmp(&b.version))
    });
    dates
}

/// Files of one release, wheels before everything else, then by name
pub fn distribution_files(files: &[ReleaseFile]) -> Vec<DistributionFile> {
    let mut out: Vec<DistributionFile> = files
        .iter()
        .map(|f| DistributionFile {
            filename: f.filename.clone(),
            packagetype: f.packagetype.clone(),
            size: f.size,
            uploaded: f.uploaded_at(),
            yanked: f.yanked,
        })
        .collect();

    out.sort_by(|a, b| {
        b.is_wheel()
            .cmp(&a.is_wheel())
            .then_with(|| a.filename.cmp(&b.filename))
    });
    out
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "UNKNOWN")
        .map(str::to_string)
}
