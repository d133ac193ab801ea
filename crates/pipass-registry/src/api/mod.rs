//! PyPI JSON API response types
//!
//! Fields the registry may omit or send as `null` get explicit defaults here,
//! so the reporter never has to look at raw JSON.

use std::collections::HashMap;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Package document from `/pypi/<name>/json` or `/pypi/<name>/<version>/json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PackageRecord {
    /// Project metadata; absent or empty means the registry has no such package
    #[serde(default)]
    pub info: Option<PackageInfo>,
    /// Files uploaded for each version
    #[serde(default, deserialize_with = "null_as_default")]
    pub releases: HashMap<String, Vec<ReleaseFile>>,
    /// Files of the version the document describes
    #[serde(default, deserialize_with = "null_as_default")]
    pub urls: Vec<ReleaseFile>,
}

/// The `info` block of a package document
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PackageInfo {
    /// Project name as registered
    #[serde(default)]
    pub name: String,
    /// Version this block describes (the latest one on the canonical path)
    #[serde(default)]
    pub version: String,
    /// One-line summary
    #[serde(default)]
    pub summary: Option<String>,
    /// Home page URL
    #[serde(default)]
    pub home_page: Option<String>,
    /// License text or identifier
    #[serde(default)]
    pub license: Option<String>,
    /// Supported Python versions
    #[serde(default)]
    pub requires_python: Option<String>,
    /// Requirement strings; `null` and missing both become empty
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_dist: Vec<String>,
    /// Registry page of the project
    #[serde(default)]
    pub project_url: Option<String>,
}

/// A single uploaded file of a release
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReleaseFile {
    #[serde(default)]
    pub filename: String,
    /// `bdist_wheel`, `sdist`, ...
    #[serde(default)]
    pub packagetype: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Upload time without a zone, e.g. `2023-05-22T15:12:44`
    #[serde(default)]
    pub upload_time: Option<String>,
    /// Upload time with a zone, e.g. `2023-05-22T15:12:44.561917Z`
    #[serde(default)]
    pub upload_time_iso_8601: Option<String>,
    #[serde(default)]
    pub yanked: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub digests: Digests,
}

/// File digests
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Digests {
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub md5: Option<String>,
}

impl PackageRecord {
    /// The `info` block, if it names a package
    pub fn info(&self) -> Option<&PackageInfo> {
        self.info.as_ref().filter(|info| !info.name.trim().is_empty())
    }
}

impl ReleaseFile {
    /// Upload time in UTC, preferring the zoned field
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        if let Some(ts) = self.upload_time_iso_8601.as_deref() {
            if let Ok(parsed) = DateTime::parse_from_rfc3339(ts) {
                return Some(parsed.with_timezone(&Utc));
            }
        }

        let ts = self.upload_time.as_deref()?;
        NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
