//! Shared data model for jobs and archive entries.
// Job configuration, option defaults, and the buffered entry form.

use std::path::PathBuf;

use serde::Deserialize;

use crate::router::Router;

/// One file or directory entry buffered on its way into or out of an
/// archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Archive key: forward-slash separated, trailing `/` on directories.
    pub path: String,
    /// True if this entry represents a directory.
    pub is_dir: bool,
    /// Decompressed content. Always empty for directories.
    pub content: Vec<u8>,
    /// Unix permission bits, when known.
    pub mode: Option<u32>,
}

impl ArchiveEntry {
    /// A directory entry. The trailing `/` marker is enforced here so that
    /// every stored directory key carries it.
    pub fn directory(path: String, mode: Option<u32>) -> Self {
        let path = if path.ends_with('/') {
            path
        } else {
            format!("{path}/")
        };
        Self {
            path,
            is_dir: true,
            content: Vec::new(),
            mode,
        }
    }

    /// A file entry with its full content.
    pub fn file(path: String, content: Vec<u8>, mode: Option<u32>) -> Self {
        Self {
            path,
            is_dir: false,
            content,
            mode,
        }
    }
}

/// Compression method for entries written by the builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compression {
    /// Entries are stored without compression.
    Store,
    /// Entries are DEFLATE-compressed at the configured level.
    #[default]
    Deflate,
}

/// Per-job tuning knobs. Values not present in a manifest fall back to the
/// defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JobOptions {
    pub compression: Compression,
    /// DEFLATE level, 1 (best speed) to 9 (best compression). Ignored
    /// under [`Compression::Store`].
    #[serde(rename = "compressionLevel")]
    pub compression_level: u32,
    /// Verify every extracted entry against its stored CRC32. Extract
    /// direction only.
    #[serde(rename = "checkCRC32")]
    pub check_crc32: bool,
    /// Remaps or excludes each entry. Not expressible in a manifest;
    /// programmatic callers install their own.
    #[serde(skip)]
    pub router: Router,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Deflate,
            compression_level: 9,
            check_crc32: true,
            router: Router::identity(),
        }
    }
}

/// Configuration for one build or extract job. Immutable once the job
/// starts.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Working root the `src` entries resolve against: glob patterns
    /// expand under it when building, archive paths resolve against it
    /// when extracting. Defaults to the process working directory.
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    /// Destination archive file (build) or destination directory
    /// (extract). Resolved to an absolute path on its own, never via
    /// `cwd`.
    pub dest: PathBuf,
    /// Glob patterns (build) or archive file paths (extract).
    pub src: Vec<String>,
    /// Let wildcards match hidden (leading-dot) entries.
    #[serde(default)]
    pub dot: bool,
    #[serde(default)]
    pub options: JobOptions,
}
