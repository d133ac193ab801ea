//! Dependency specification types.
//!
//! A `DependencySpec` is a `Requires-Dist` string split into the parts worth
//! showing: target name, extras, version constraint and environment marker.
//! Nothing here evaluates a constraint or a marker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared requirement of a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    /// Requirement string exactly as the registry sent it
    pub raw: String,
    /// Target package name
    pub name: String,
    /// Extras requested from the target (`name[a,b]`)
    pub extras: Vec<String>,
    /// Version constraint expression, e.g. `>=2.0,<4`
    pub constraint: Option<String>,
    /// Environment marker, e.g. `python_version < "3.8"`
    pub marker: Option<String>,
}

impl DependencySpec {
    /// Split a requirement string into its displayable parts.
    ///
    /// Never fails: a string that does not start with a valid name keeps the
    /// whole requirement part as its name so it can still be printed.
    pub fn parse(raw: &str) -> Self {
        let (requirement, marker) = match raw.split_once(';') {
            Some((req, marker)) => (req.trim(), non_empty(marker)),
            None => (raw.trim(), None),
        };

        let name_end = requirement
            .char_indices()
            .find(|(_, c)| !is_name_char(*c))
            .map(|(idx, _)| idx)
            .unwrap_or(requirement.len());

        if name_end == 0 {
            return Self {
                raw: raw.to_string(),
                name: requirement.to_string(),
                extras: Vec::new(),
                constraint: None,
                marker,
            };
        }

        let name = requirement[..name_end].to_string();
        let mut rest = requirement[name_end..].trim_start();

        let mut extras = Vec::new();
        if let Some(after_open) = rest.strip_prefix('[') {
            if let Some(close) = after_open.find(']') {
                extras = after_open[..close]
                    .split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(str::to_string)
                    .collect();
                rest = after_open[close + 1..].trim_start();
            }
        }

        let mut constraint = rest.trim();
        if constraint.starts_with('(') && constraint.ends_with(')') {
            constraint = &constraint[1..constraint.len() - 1];
        }

        Self {
            raw: raw.to_string(),
            name,
            extras,
            constraint: non_empty(constraint),
            marker,
        }
    }

    /// Whether the requirement only applies when an extra is requested
    pub fn is_extra(&self) -> bool {
        self.marker
            .as_deref()
            .map(|m| m.split(|c: char| !c.is_alphanumeric() && c != '_').any(|word| word == "extra"))
            .unwrap_or(false)
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
