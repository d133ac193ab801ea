//! Report types.
//!
//! `ReportView` is what the metadata reporter hands to the CLI for printing.
//! It is built fresh for every invocation and never stored.

use super::DependencySpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display object for one package/version lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportView {
    /// Package name as the registry spells it
    pub name: String,
    /// Version the report describes
    pub version: String,
    /// Latest version according to the registry
    pub latest_version: String,
    /// Whether `version` was requested explicitly
    pub version_requested: bool,
    pub summary: Option<String>,
    pub home_page: Option<String>,
    pub license: Option<String>,
    pub requires_python: Option<String>,
    /// Releases with at least one file, oldest first
    pub versions: Vec<ReleaseDate>,
    /// Declared requirements of `version`
    pub dependencies: Vec<DependencySpec>,
    /// Distribution files of `version`, wheels first
    pub files: Vec<DistributionFile>,
}

/// One row of the version history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDate {
    pub version: String,
    /// Earliest upload time among the release's files
    pub released: DateTime<Utc>,
    /// Every file of the release has been yanked
    pub yanked: bool,
}

/// One uploaded file of the selected release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionFile {
    pub filename: String,
    /// `bdist_wheel`, `sdist`, ...
    pub packagetype: String,
    /// Size in bytes
    pub size: u64,
    pub uploaded: Option<DateTime<Utc>>,
    pub yanked: bool,
}

impl ReportView {
    /// Dependencies that apply without requesting an extra
    pub fn base_dependencies(&self) -> impl Iterator<Item = &DependencySpec> {
        self.dependencies.iter().filter(|dep| !dep.is_extra())
    }

    /// Whether the report describes the latest release
    pub fn is_latest(&self) -> bool {
        self.version == self.latest_version
    }
}

impl DistributionFile {
    /// Whether this file is a built wheel
    pub fn is_wheel(&self) -> bool {
        self.packagetype == "bdist_wheel" || self.filename.ends_with(".whl")
    }
}
