//! Cross-platform helpers for Unix permission bits.
//!
//! Entries record their mode when packed on a platform that tracks one,
//! and extracted entries get their stored mode applied back. On other
//! platforms both directions degrade to no-ops, so call-sites stay
//! identical across OSes.

use std::fs::Metadata;
use std::io;
use std::path::Path;

#[cfg(unix)]
/// Permission bits of `metadata`, masked to the classic `rwx` triplet.
pub fn unix_mode(metadata: &Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
/// POSIX permission bits are not tracked on this platform.
pub fn unix_mode(_metadata: &Metadata) -> Option<u32> {
    None
}

#[cfg(unix)]
/// Set POSIX permission bits on Unix.
pub fn set_unix_permissions(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
/// No-op on this platform: POSIX permission bits are not preserved.
pub fn set_unix_permissions(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
