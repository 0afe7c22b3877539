//! Glob-driven enumeration of the tree being packed.
//!
//! Patterns expand relative to the job's working root. Directories and
//! files are collected in separate passes so the builder can register all
//! matched directories before any file, and explicitly matched empty
//! directories survive into the archive.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::{glob_with, MatchOptions, Pattern};

use crate::error::PackError;

/// Expands `patterns` under `cwd` and keeps the matching directories.
pub fn expand_dirs(cwd: &Path, patterns: &[String], dot: bool) -> Result<Vec<PathBuf>, PackError> {
    expand(cwd, patterns, dot, false)
}

/// Expands `patterns` under `cwd` and keeps the matching files.
pub fn expand_files(cwd: &Path, patterns: &[String], dot: bool) -> Result<Vec<PathBuf>, PackError> {
    expand(cwd, patterns, dot, true)
}

/// One glob pass per pattern. Results are relative to `cwd` and
/// deduplicated across patterns, in the stable order the glob iterator
/// yields them.
fn expand(
    cwd: &Path,
    patterns: &[String],
    dot: bool,
    want_files: bool,
) -> Result<Vec<PathBuf>, PackError> {
    let options = MatchOptions {
        // Wildcards only cross a leading dot when hidden entries are
        // requested; a literal dot in the pattern still matches.
        require_literal_leading_dot: !dot,
        ..MatchOptions::new()
    };

    // The working root is part of the glob string, so its own special
    // characters must not be interpreted.
    let base = Pattern::escape(&cwd.to_string_lossy());
    let base = base.trim_end_matches('/').to_owned();

    let mut seen = HashSet::new();
    let mut matches = Vec::new();

    for pattern in patterns {
        let full = format!("{base}/{pattern}");
        for result in glob_with(&full, options)? {
            let path = result?;
            let keep = if want_files {
                path.is_file()
            } else {
                path.is_dir()
            };
            if !keep {
                continue;
            }
            let relative = path
                .strip_prefix(cwd)
                .map_err(|_| PackError::StripPrefix {
                    prefix: cwd.to_path_buf(),
                    path: path.clone(),
                })?
                .to_path_buf();
            if seen.insert(relative.clone()) {
                matches.push(relative);
            }
        }
    }

    Ok(matches)
}

/// Converts a host-relative path into its archive key: forward slashes
/// regardless of the host separator, trailing `/` on directories.
pub fn to_archive_key(relative: &Path, is_dir: bool) -> String {
    let mut key = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if is_dir && !key.ends_with('/') {
        key.push('/');
    }
    key
}
