//! Package name helpers.

/// Normalize a project name the way the registry indexes it (PEP 503).
///
/// Lowercases and collapses every run of `-`, `_` and `.` into one `-`.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;

    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
                in_separator = true;
            }
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }

    out
}

/// Check if this is a valid project name (PEP 508).
///
/// ASCII letters and digits at both ends, with `.`, `-` and `_` allowed in
/// between.
pub fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes
                    .iter()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
        }
        _ => false,
    }
}
