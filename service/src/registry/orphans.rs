//! Orphan detection and cleanup
//!
//! Two kinds of orphan exist: entries whose data file has disappeared, and
//! spreadsheet files that no entry references. Scans never fail on a single
//! bad item; they log it and move on.

use super::MappingRegistry;
use crate::file_system_adapter;
use sheetsync_core::{CleanupReport, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

impl MappingRegistry {
    /// Registered data paths whose file no longer exists
    #[must_use]
    pub fn find_orphan_data_paths(&self) -> Vec<PathBuf> {
        self.entries
            .values()
            .filter(|e| !e.data_path.exists())
            .map(|e| e.data_path.clone())
            .collect()
    }

    /// Spreadsheet files directly inside the spreadsheet directory that no
    /// entry references, sorted by path. Only files with `extension`
    /// (compared case-insensitively) are considered.
    ///
    /// # Errors
    ///
    /// Never fails today; unreadable directory entries are logged and skipped
    pub fn find_orphan_spreadsheets(&self, extension: &str) -> Result<Vec<PathBuf>> {
        if !self.spreadsheet_dir.is_dir() {
            return Ok(Vec::new());
        }

        let referenced: HashSet<&str> = self
            .entries
            .values()
            .map(|e| e.spreadsheet_name.as_str())
            .collect();

        let mut orphans = Vec::new();
        for entry in WalkDir::new(&self.spreadsheet_dir)
            .min_depth(1)
            .max_depth(1)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %self.spreadsheet_dir.display(), "skipping unreadable entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !has_extension(entry.path(), extension) {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !referenced.contains(name.as_ref()) {
                orphans.push(entry.into_path());
            }
        }
        orphans.sort();
        Ok(orphans)
    }

    /// Remove dangling entries together with their spreadsheets.
    ///
    /// Each spreadsheet is deleted (a missing one is fine) and its entry
    /// dropped; an entry whose spreadsheet cannot be deleted is kept and
    /// reported. The registry is saved once at the end.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the registry cannot be saved
    pub fn delete_orphan_mappings(&mut self, data_paths: &[PathBuf]) -> Result<CleanupReport> {
        let mut report = CleanupReport::default();
        let snapshot = self.entries.clone();

        for data_path in data_paths {
            let Some(entry) = self.entries.get(data_path) else {
                warn!(data_path = %data_path.display(), "not registered, skipping");
                report
                    .failed
                    .push((data_path.clone(), "not registered".to_string()));
                continue;
            };
            let sheet = self.spreadsheet_path(&entry.spreadsheet_name);
            match file_system_adapter::remove_file_if_exists(&sheet) {
                Ok(_) => {
                    self.entries.shift_remove(data_path);
                    info!(data_path = %data_path.display(), spreadsheet = %sheet.display(), "orphan mapping deleted");
                    report.removed.push(data_path.clone());
                }
                Err(e) => {
                    warn!(data_path = %data_path.display(), "cannot delete orphan mapping: {e}");
                    report.failed.push((data_path.clone(), e.to_string()));
                }
            }
        }

        if !report.removed.is_empty() {
            if let Err(e) = self.save() {
                self.entries = snapshot;
                return Err(e);
            }
        }
        Ok(report)
    }

    /// Delete unreferenced spreadsheet files.
    ///
    /// Files that gained a registry entry since the scan are skipped.
    pub fn delete_orphan_spreadsheets(&self, paths: &[PathBuf]) -> CleanupReport {
        let mut report = CleanupReport::default();
        for path in paths {
            let referenced = path
                .file_name()
                .is_some_and(|name| self.exists(&name.to_string_lossy()));
            if referenced {
                warn!(path = %path.display(), "spreadsheet is referenced, not deleting");
                report
                    .failed
                    .push((path.clone(), "referenced by a mapping".to_string()));
                continue;
            }
            match file_system_adapter::remove_file_if_exists(path) {
                Ok(_) => {
                    info!(path = %path.display(), "orphan spreadsheet deleted");
                    report.removed.push(path.clone());
                }
                Err(e) => {
                    warn!(path = %path.display(), "cannot delete orphan spreadsheet: {e}");
                    report.failed.push((path.clone(), e.to_string()));
                }
            }
        }
        report
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
}
