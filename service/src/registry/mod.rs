//! Persistent registry of (data file, spreadsheet) pairs
//!
//! The registry is a single XML document loaded whole, mutated in memory and
//! written back whole. Every mutating call persists before it returns; if the
//! write fails the in-memory change is rolled back so memory and disk agree.

mod document;
mod orphans;

use crate::file_system_adapter;
use crate::hasher;
use indexmap::IndexMap;
use sheetsync_core::{RegistryEntry, Result, SyncError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// In-memory view of the registry document
#[derive(Debug, Clone)]
pub struct MappingRegistry {
    path: PathBuf,
    spreadsheet_dir: PathBuf,
    entries: IndexMap<PathBuf, RegistryEntry>,
}

impl MappingRegistry {
    /// Load the registry document; a missing document is an empty registry
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the document exists but cannot be read and
    /// `SyncError::Registry` if it is malformed or violates uniqueness
    pub fn load(path: impl Into<PathBuf>, spreadsheet_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut registry = Self {
            path: path.into(),
            spreadsheet_dir: spreadsheet_dir.into(),
            entries: IndexMap::new(),
        };
        registry.reload()?;
        Ok(registry)
    }

    /// Discard in-memory state and re-read the document
    ///
    /// # Errors
    ///
    /// Same as [`MappingRegistry::load`]
    pub fn reload(&mut self) -> Result<()> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "registry document absent, starting empty");
                self.entries.clear();
                return Ok(());
            }
            Err(e) => return Err(SyncError::io(&self.path, e)),
        };

        let mut entries = IndexMap::new();
        for entry in document::parse(&self.path, &text)? {
            if entries.contains_key(&entry.data_path) {
                return Err(SyncError::registry(
                    &self.path,
                    format!("data path {} is mapped twice", entry.data_path.display()),
                ));
            }
            if entries
                .values()
                .any(|e: &RegistryEntry| e.spreadsheet_name == entry.spreadsheet_name)
            {
                return Err(SyncError::registry(
                    &self.path,
                    format!("spreadsheet {} is mapped twice", entry.spreadsheet_name),
                ));
            }
            entries.insert(entry.data_path.clone(), entry);
        }
        self.entries = entries;
        debug!(path = %self.path.display(), entries = self.entries.len(), "registry loaded");
        Ok(())
    }

    /// Write the whole document
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the document cannot be written
    pub fn save(&self) -> Result<()> {
        let bytes = document::render(&self.path, self.entries.values())?;
        file_system_adapter::write_atomic(&self.path, &bytes)
    }

    /// Registry document location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory every spreadsheet lives in
    #[must_use]
    pub fn spreadsheet_dir(&self) -> &Path {
        &self.spreadsheet_dir
    }

    /// Full path of a spreadsheet by name
    #[must_use]
    pub fn spreadsheet_path(&self, spreadsheet_name: &str) -> PathBuf {
        self.spreadsheet_dir.join(spreadsheet_name)
    }

    /// Number of pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    /// Entry for a data path
    #[must_use]
    pub fn get(&self, data_path: &Path) -> Option<&RegistryEntry> {
        self.entries.get(data_path)
    }

    /// Spreadsheet name paired with a data path
    #[must_use]
    pub fn lookup_spreadsheet(&self, data_path: &Path) -> Option<&str> {
        self.entries
            .get(data_path)
            .map(|e| e.spreadsheet_name.as_str())
    }

    /// Whether any entry owns this spreadsheet name
    #[must_use]
    pub fn exists(&self, spreadsheet_name: &str) -> bool {
        self.find_by_spreadsheet(spreadsheet_name).is_some()
    }

    /// All pairs in insertion order
    #[must_use]
    pub fn list_all(&self) -> Vec<(PathBuf, String)> {
        self.entries
            .values()
            .map(|e| (e.data_path.clone(), e.spreadsheet_name.clone()))
            .collect()
    }

    /// Register a new pair and persist
    ///
    /// # Errors
    ///
    /// - `SyncError::DuplicateMapping` if the data path is registered
    /// - `SyncError::DuplicateSpreadsheet` if the name is taken
    /// - `SyncError::InvalidName` if the name is not a bare file name
    /// - `SyncError::Io` if the document cannot be written
    pub fn insert(&mut self, data_path: impl Into<PathBuf>, spreadsheet_name: &str) -> Result<()> {
        let data_path = data_path.into();
        if self.entries.contains_key(&data_path) {
            return Err(SyncError::DuplicateMapping { data_path });
        }
        validate_spreadsheet_name(spreadsheet_name)?;
        if self.exists(spreadsheet_name) {
            return Err(SyncError::DuplicateSpreadsheet {
                name: spreadsheet_name.to_string(),
            });
        }

        self.entries.insert(
            data_path.clone(),
            RegistryEntry::new(data_path.clone(), spreadsheet_name),
        );
        if let Err(e) = self.save() {
            self.entries.shift_remove(&data_path);
            return Err(e);
        }
        debug!(data_path = %data_path.display(), spreadsheet = spreadsheet_name, "mapping registered");
        Ok(())
    }

    /// Remove a pair and persist. Returns the removed entry, or `None` if the
    /// data path was not registered (nothing is written in that case).
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the document cannot be written
    pub fn remove(&mut self, data_path: &Path) -> Result<Option<RegistryEntry>> {
        let Some(index) = self.entries.get_index_of(data_path) else {
            return Ok(None);
        };
        let Some((key, entry)) = self.entries.shift_remove_index(index) else {
            return Ok(None);
        };
        if let Err(e) = self.save() {
            self.entries.shift_insert(index, key, entry);
            return Err(e);
        }
        debug!(data_path = %data_path.display(), "mapping removed");
        Ok(Some(entry))
    }

    /// Digest stored for a spreadsheet, if any
    #[must_use]
    pub fn stored_digest(&self, spreadsheet_name: &str) -> Option<&str> {
        self.find_by_spreadsheet(spreadsheet_name)
            .and_then(|e| e.last_digest.as_deref())
    }

    /// Whether the spreadsheet's current digest equals the stored one
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the spreadsheet cannot be read
    pub fn is_fresh(&self, spreadsheet_name: &str) -> Result<bool> {
        let current = hasher::digest(&self.spreadsheet_path(spreadsheet_name))?;
        Ok(self
            .stored_digest(spreadsheet_name)
            .is_some_and(|stored| hasher::same_digest(stored, &current)))
    }

    /// Compare the spreadsheet's digest with the stored one and optionally
    /// record the new digest.
    ///
    /// Returns `true` only if the digest already matched before any update.
    /// When `should_update` is set and the digest differs, the new digest is
    /// stored and the registry persisted. Unregistered names are never fresh
    /// and are never stored.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the spreadsheet cannot be read or the
    /// document cannot be written
    pub fn check_and_update_digest(
        &mut self,
        spreadsheet_name: &str,
        should_update: bool,
    ) -> Result<bool> {
        let current = hasher::digest(&self.spreadsheet_path(spreadsheet_name))?;
        let Some(key) = self
            .find_by_spreadsheet(spreadsheet_name)
            .map(|e| e.data_path.clone())
        else {
            return Ok(false);
        };

        let fresh = self.entries[&key]
            .last_digest
            .as_deref()
            .is_some_and(|stored| hasher::same_digest(stored, &current));
        if should_update && !fresh {
            self.record_digest(spreadsheet_name, current)?;
        }
        Ok(fresh)
    }

    /// Store `digest` for a registered spreadsheet and persist. Unregistered
    /// names are ignored. The previous digest is restored if saving fails.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the document cannot be written
    pub fn record_digest(&mut self, spreadsheet_name: &str, digest: String) -> Result<()> {
        let Some(key) = self
            .find_by_spreadsheet(spreadsheet_name)
            .map(|e| e.data_path.clone())
        else {
            return Ok(());
        };

        let previous = self
            .entries
            .get_mut(&key)
            .and_then(|e| e.last_digest.replace(digest));
        if let Err(e) = self.save() {
            if let Some(entry) = self.entries.get_mut(&key) {
                entry.last_digest = previous;
            }
            return Err(e);
        }
        debug!(spreadsheet = spreadsheet_name, "digest recorded");
        Ok(())
    }

    fn find_by_spreadsheet(&self, spreadsheet_name: &str) -> Option<&RegistryEntry> {
        self.entries
            .values()
            .find(|e| e.spreadsheet_name == spreadsheet_name)
    }
}

/// Reject names that would not land directly inside the spreadsheet directory
pub(crate) fn validate_spreadsheet_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| SyncError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("name contains a path separator"));
    }
    if name == "." || name == ".." {
        return Err(invalid("name refers to a directory"));
    }
    Ok(())
}
