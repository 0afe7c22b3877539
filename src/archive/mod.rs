//! # Archive Builder
//!
//! Builds a ZIP archive from the tree entries selected by a job's glob
//! patterns. Every enumerated entry is routed before it is added: a routed
//! entry may land under a different name, and an excluded entry leaves no
//! trace in the output. Directories are registered before files so that
//! explicitly matched empty directories survive.

use std::io::{Cursor, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tokio::task;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::common::{ArchiveEntry, Compression, JobConfig};
use crate::enumerate;
use crate::error::PackError;
use crate::fsx;
use crate::router::RouteDecision;

/// Builds the archive described by `config` and writes it to
/// `config.dest`.
///
/// The whole archive is serialized in memory first; the destination only
/// ever holds a complete archive, published in a single rename.
pub async fn build(config: &JobConfig) -> Result<(), PackError> {
    let cwd = match &config.cwd {
        Some(dir) => std::path::absolute(dir).map_err(|e| PackError::io(e, dir.clone()))?,
        None => std::env::current_dir()?,
    };
    // The destination does not use the cwd option, resolve it on its own.
    let dest =
        std::path::absolute(&config.dest).map_err(|e| PackError::io(e, config.dest.clone()))?;

    debug!("creating {}", dest.display());

    let folders = enumerate::expand_dirs(&cwd, &config.src, config.dot)?;
    let files = enumerate::expand_files(&cwd, &config.src, config.dot)?;

    let mut entries: Vec<ArchiveEntry> = Vec::with_capacity(folders.len() + files.len());

    for folder in folders {
        let decision = RouteDecision::for_tree_entry(&config.options.router, &cwd, &folder, false);
        let (Some(routed), Some(absolute)) = (decision.routed, decision.absolute) else {
            debug!("skipped folder {}", decision.relative);
            continue;
        };
        let mode = tokio::fs::metadata(&absolute)
            .await
            .ok()
            .and_then(|metadata| fsx::unix_mode(&metadata));
        if routed != decision.relative {
            debug!("added folder {} as {}", decision.relative, routed);
        } else {
            debug!("added folder {routed}");
        }
        entries.push(ArchiveEntry::directory(routed, mode));
    }

    for file in files {
        let decision = RouteDecision::for_tree_entry(&config.options.router, &cwd, &file, true);
        let (Some(routed), Some(absolute)) = (decision.routed, decision.absolute) else {
            debug!("skipped file {}", decision.relative);
            continue;
        };
        let content = tokio::fs::read(&absolute)
            .await
            .map_err(|e| PackError::io(e, absolute.clone()))?;
        let mode = tokio::fs::metadata(&absolute)
            .await
            .ok()
            .and_then(|metadata| fsx::unix_mode(&metadata));
        if routed != decision.relative {
            debug!("added file {} as {}", decision.relative, routed);
        } else {
            debug!("added file {routed}");
        }
        entries.push(ArchiveEntry::file(routed, content, mode));
    }

    // Make sure the destination directory exists.
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PackError::io(e, parent.to_path_buf()))?;
    }

    let compression = config.options.compression;
    let level = config.options.compression_level;
    task::spawn_blocking(move || write_archive(&dest, &entries, compression, level))
        .await
        .map_err(|e| PackError::Other(Box::new(e)))?
}

/// Serializes `entries` and publishes the result at `dest` in one rename,
/// staging through a sibling temp file so a failed job cannot leave a
/// half-written destination behind.
fn write_archive(
    dest: &Path,
    entries: &[ArchiveEntry],
    compression: Compression,
    level: u32,
) -> Result<(), PackError> {
    let output = serialize(entries, compression, level)?;

    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| PackError::io(e, dir.to_path_buf()))?;
    staged
        .write_all(&output)
        .map_err(|e| PackError::io(e, dest.to_path_buf()))?;
    staged
        .persist(dest)
        .map_err(|e| PackError::io(e.error, dest.to_path_buf()))?;
    Ok(())
}

/// Encodes the entry set as a ZIP archive in memory.
fn serialize(
    entries: &[ArchiveEntry],
    compression: Compression,
    level: u32,
) -> Result<Vec<u8>, PackError> {
    let method = match compression {
        Compression::Store => CompressionMethod::Stored,
        Compression::Deflate => CompressionMethod::Deflated,
    };

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        let mut options = FileOptions::default().compression_method(method);
        if compression == Compression::Deflate {
            options = options.compression_level(Some(level.clamp(1, 9) as i32));
        }
        if let Some(mode) = entry.mode {
            options = options.unix_permissions(mode);
        }
        if entry.is_dir {
            writer.add_directory(entry.path.trim_end_matches('/'), options)?;
        } else {
            writer.start_file(entry.path.as_str(), options)?;
            writer.write_all(&entry.content)?;
        }
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(output: &[u8]) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(output.to_vec())).unwrap();
        (0..archive.len())
            .map(|index| archive.by_index(index).unwrap().name().to_owned())
            .collect()
    }

    #[test]
    fn serializes_directories_with_markers_and_files_without() {
        let entries = vec![
            ArchiveEntry::directory("sub".into(), None),
            ArchiveEntry::file("sub/two.php".into(), b"<?php\n".to_vec(), None),
        ];
        let output = serialize(&entries, Compression::Deflate, 9).unwrap();
        assert_eq!(keys(&output), vec!["sub/", "sub/two.php"]);
    }

    #[test]
    fn store_mode_keeps_content_readable() {
        let entries = vec![ArchiveEntry::file(
            "one.js".into(),
            b"console.log('one');\n".to_vec(),
            None,
        )];
        let output = serialize(&entries, Compression::Store, 9).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(output)).unwrap();
        let mut entry = archive.by_index(0).unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Stored);
        let mut content = Vec::new();
        std::io::Read::read_to_end(&mut entry, &mut content).unwrap();
        assert_eq!(content, b"console.log('one');\n");
    }
}
