//! File system helpers shared by the registry, converter and skeleton writer
//!
//! Writes go through a temporary file in the destination directory followed
//! by a rename, so a reader never observes a half-written document.

use sheetsync_core::{Result, SyncError};
use std::io::Write;
use std::path::Path;

/// Replace `path` with `bytes`, creating parent directories as needed
///
/// # Errors
///
/// Returns `SyncError::Io` if the directory, temporary file or rename fails
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| SyncError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| SyncError::io(tmp.path(), e))?;
    tmp.flush().map_err(|e| SyncError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| SyncError::io(path, e.error))?;
    Ok(())
}

/// Delete a file, treating "already gone" as success.
///
/// Returns whether a file was actually removed.
///
/// # Errors
///
/// Returns `SyncError::Io` for any failure other than `NotFound`
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SyncError::io(path, e)),
    }
}

/// Create a directory and its parents
///
/// # Errors
///
/// Returns `SyncError::Io` if creation fails
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| SyncError::io(path, e))
}
