//! Spreadsheet name allocation
//!
//! A new data file gets a spreadsheet named after its file stem. When that
//! name is taken, directory names are prepended one level at a time
//! (`c.xlsx`, `b_c.xlsx`, `x_b_c.xlsx`, ...) until the name is free or the
//! path runs out of directories.

use crate::file_system_adapter;
use crate::registry::{MappingRegistry, validate_spreadsheet_name};
use sheetsync_core::{Result, SyncError};
use std::path::Path;
use tracing::{debug, info};

/// First name tried for a data file: its file name with the extension
/// replaced (or appended when it has none)
///
/// # Errors
///
/// Returns `SyncError::InvalidName` if the path has no file name
pub fn candidate_name(data_path: &Path, extension: &str) -> Result<String> {
    let file_name = data_path.file_name().ok_or_else(|| SyncError::InvalidName {
        name: data_path.display().to_string(),
        reason: "data path has no file name".to_string(),
    })?;
    Ok(Path::new(file_name)
        .with_extension(extension)
        .to_string_lossy()
        .into_owned())
}

/// Derives unique spreadsheet names against a registry snapshot
#[derive(Debug, Clone, Copy)]
pub struct NameAllocator<'a> {
    registry: &'a MappingRegistry,
    extension: &'a str,
}

impl<'a> NameAllocator<'a> {
    /// Allocator producing names with `extension`
    #[must_use]
    pub fn new(registry: &'a MappingRegistry, extension: &'a str) -> Self {
        Self {
            registry,
            extension,
        }
    }

    /// Pick a name no entry owns. Deterministic for a given path and
    /// registry state.
    ///
    /// # Errors
    ///
    /// - `SyncError::NameResolution` if every breadcrumb still collides
    /// - `SyncError::InvalidName` if the path yields an unusable name
    pub fn allocate(&self, data_path: &Path) -> Result<String> {
        let mut candidate = candidate_name(data_path, self.extension)?;
        let mut remaining = data_path.parent();

        loop {
            validate_spreadsheet_name(&candidate)?;
            if !self.registry.exists(&candidate) {
                debug!(data_path = %data_path.display(), spreadsheet = %candidate, "name allocated");
                return Ok(candidate);
            }

            let Some(dir) = remaining.filter(|d| !d.as_os_str().is_empty()) else {
                return Err(SyncError::NameResolution {
                    data_path: data_path.to_path_buf(),
                });
            };
            let Some(tag) = breadcrumb(dir) else {
                return Err(SyncError::NameResolution {
                    data_path: data_path.to_path_buf(),
                });
            };
            candidate = format!("{tag}_{candidate}");
            remaining = dir.parent();
        }
    }
}

/// Directory name used as a prefix. Components without a name (a drive
/// prefix such as `C:\`) fall back to their first alphanumeric character.
fn breadcrumb(dir: &Path) -> Option<String> {
    if let Some(name) = dir.file_name() {
        return Some(name.to_string_lossy().into_owned());
    }
    dir.to_string_lossy()
        .chars()
        .find(char::is_ascii_alphanumeric)
        .map(String::from)
}

/// Clear the way for registering `data_path` again.
///
/// If the path is registered and `overwrite` is false this fails; with
/// `overwrite` the old data file, the old spreadsheet and the entry are
/// removed.
///
/// # Errors
///
/// - `SyncError::DuplicateMapping` if registered and not overwriting
/// - `SyncError::Io` if a file or the registry cannot be updated
pub fn release_existing(
    registry: &mut MappingRegistry,
    data_path: &Path,
    overwrite: bool,
) -> Result<()> {
    let Some(old_name) = registry.lookup_spreadsheet(data_path).map(str::to_string) else {
        return Ok(());
    };
    if !overwrite {
        return Err(SyncError::DuplicateMapping {
            data_path: data_path.to_path_buf(),
        });
    }

    file_system_adapter::remove_file_if_exists(data_path)?;
    file_system_adapter::remove_file_if_exists(&registry.spreadsheet_path(&old_name))?;
    registry.remove(data_path)?;
    info!(data_path = %data_path.display(), spreadsheet = %old_name, "previous mapping replaced");
    Ok(())
}
