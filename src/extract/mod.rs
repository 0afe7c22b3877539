//! # Archive Extractor
//!
//! Unpacks ZIP archives onto the filesystem. Every entry is routed before
//! it is materialized, in the order the codec yields them; parent
//! directories are created lazily before each write, so nothing depends on
//! directory entries preceding file entries in the container.

use std::io::{self, Cursor, Read};
use std::path::Path;

use tokio::task;
use tracing::{debug, warn};
use zip::read::ZipFile;
use zip::ZipArchive;

use crate::common::{ArchiveEntry, JobConfig};
use crate::error::PackError;
use crate::fsx;
use crate::router::RouteDecision;

/// Unpacks every archive listed in `config.src` into `config.dest`.
///
/// A source without the `.zip` extension is skipped with a warning and
/// does not fail the job. A missing source, a corrupt archive, or a failed
/// integrity check fails the whole job.
pub async fn extract(config: &JobConfig) -> Result<(), PackError> {
    let cwd = match &config.cwd {
        Some(dir) => std::path::absolute(dir).map_err(|e| PackError::io(e, dir.clone()))?,
        None => std::env::current_dir()?,
    };
    // The destination does not use the cwd option, resolve it on its own.
    let dest =
        std::path::absolute(&config.dest).map_err(|e| PackError::io(e, config.dest.clone()))?;

    for src in &config.src {
        let file = cwd.join(src);
        if file.extension().and_then(|e| e.to_str()) != Some("zip") {
            warn!("{src} is not a ZIP file, skipping");
            continue;
        }
        debug!("extracting {} to {}", src, dest.display());

        let input = tokio::fs::read(&file)
            .await
            .map_err(|e| PackError::io(e, file.clone()))?;
        let check_crc32 = config.options.check_crc32;
        let archive_path = file.clone();
        let entries =
            task::spawn_blocking(move || read_entries(&archive_path, input, check_crc32))
                .await
                .map_err(|e| PackError::Other(Box::new(e)))??;

        for entry in entries {
            let is_file = !entry.is_dir;
            let kind = if entry.is_dir { "folder" } else { "file" };
            let decision = RouteDecision::for_archive_entry(
                &config.options.router,
                &dest,
                &entry.path,
                is_file,
            );
            let (Some(routed), Some(absolute)) = (decision.routed, decision.absolute) else {
                debug!("skipped {kind} {}", decision.relative);
                continue;
            };

            if entry.is_dir {
                tokio::fs::create_dir_all(&absolute)
                    .await
                    .map_err(|e| PackError::io(e, absolute.clone()))?;
            } else {
                if let Some(parent) = absolute.parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| PackError::io(e, parent.to_path_buf()))?;
                }
                tokio::fs::write(&absolute, &entry.content)
                    .await
                    .map_err(|e| PackError::io(e, absolute.clone()))?;
                if let Some(mode) = entry.mode {
                    fsx::set_unix_permissions(&absolute, mode)
                        .map_err(|e| PackError::io(e, absolute.clone()))?;
                }
            }

            if routed != decision.relative {
                debug!("created {kind} {} as {}", decision.relative, routed);
            } else {
                debug!("created {kind} {routed}");
            }
        }
    }

    Ok(())
}

/// Decodes every entry of the archive into memory, in the order the codec
/// stores them. With `check_crc32` set, each file entry's bytes are
/// verified against the stored CRC32 and the first mismatch fails the
/// whole archive.
fn read_entries(
    archive_path: &Path,
    input: Vec<u8>,
    check_crc32: bool,
) -> Result<Vec<ArchiveEntry>, PackError> {
    let mut archive = ZipArchive::new(Cursor::new(input))?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let key = entry.name().to_owned();
        let mode = entry.unix_mode();

        if entry.is_dir() {
            entries.push(ArchiveEntry::directory(key, mode));
            continue;
        }

        let content =
            read_entry_bytes(&mut entry).map_err(|e| PackError::io(e, archive_path))?;
        if check_crc32 && crc32fast::hash(&content) != entry.crc32() {
            return Err(PackError::Checksum {
                archive: archive_path.to_path_buf(),
                entry: key,
            });
        }
        entries.push(ArchiveEntry::file(key, content, mode));
    }

    Ok(entries)
}

/// Reads an entry's decompressed bytes. The codec validates the stored
/// CRC32 at end of stream on its own; that verdict is swallowed here
/// because the check is applied, or not, by the caller.
fn read_entry_bytes(entry: &mut ZipFile<'_>) -> io::Result<Vec<u8>> {
    let mut content = Vec::with_capacity(entry.size() as usize);
    match entry.read_to_end(&mut content) {
        Ok(_) => Ok(content),
        Err(err)
            if err.kind() == io::ErrorKind::Other
                && err.to_string().contains("Invalid checksum") =>
        {
            Ok(content)
        }
        Err(err) => Err(err),
    }
}
