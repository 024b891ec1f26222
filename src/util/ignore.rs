//! Name-based ignore lists.
//!
//! Games and expansions can be excluded from reconciliation by name via
//! newline-delimited files. Lines are trimmed; blank lines and lines
//! starting with `#` are skipped.

use std::collections::HashSet;
use std::path::Path;

use crate::error::ConfigError;

/// Loads an ignore-list file into a set of names.
pub fn load_ignore_list(path: &Path) -> Result<HashSet<String>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::IgnoreFile {
        path: path.display().to_string(),
        source,
    })?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
