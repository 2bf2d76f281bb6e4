//! Content digests for staleness detection
//!
//! Digests are written as lowercase hex. Registry documents from the older
//! tool store the same SHA-256 as dash-separated uppercase pairs
//! (`BA-78-16-...`); [`same_digest`] treats both spellings as equal, so
//! migrated pairs are not reconverted. They are rewritten in the new form
//! the next time they are converted.

use sha2::{Digest, Sha256};
use sheetsync_core::{Result, SyncError};
use std::fs::File;
use std::io;
use std::path::Path;

/// SHA-256 of a file's bytes as lowercase hex
///
/// # Errors
///
/// Returns `SyncError::Io` if the file cannot be opened or read
pub fn digest(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| SyncError::io(path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| SyncError::io(path, e))?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// SHA-256 of an in-memory buffer as lowercase hex
#[must_use]
pub fn digest_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Whether a stored digest names the same content as `current`, accepting
/// the legacy dash-separated form
#[must_use]
pub fn same_digest(stored: &str, current: &str) -> bool {
    let mut stored = stored.bytes().filter(|b| *b != b'-');
    let mut current = current.bytes();
    loop {
        match (stored.next(), current.next()) {
            (None, None) => return true,
            (Some(a), Some(b)) if a.eq_ignore_ascii_case(&b) => {}
            _ => return false,
        }
    }
}
