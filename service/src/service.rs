//! Synchronization service
//!
//! `SheetSync` owns the configuration and the loaded registry and exposes
//! every registry-level operation. Components receive both explicitly;
//! nothing is reachable through globals.

use crate::converter::ConversionEngine;
use crate::file_system_adapter;
use crate::naming::{self, NameAllocator};
use crate::registry::MappingRegistry;
use crate::skeleton::SkeletonFactory;
use crate::sync;
use sheetsync_core::{CleanupReport, PairOutcome, Result, SyncConfig, SyncError, SyncReport};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Registry plus the configuration it was loaded with
#[derive(Debug)]
pub struct SheetSync {
    config: SyncConfig,
    registry: MappingRegistry,
}

impl SheetSync {
    /// Validate the configuration, create the spreadsheet directory and load
    /// the registry.
    ///
    /// # Errors
    ///
    /// - `SyncError::Config` for invalid settings
    /// - `SyncError::Io` / `SyncError::Registry` if the registry cannot be loaded
    pub fn open(config: SyncConfig) -> Result<Self> {
        config.validate()?;
        config.ensure_layout()?;
        let registry = MappingRegistry::load(&config.registry_path, &config.spreadsheet_dir)?;
        debug!(registry = %config.registry_path.display(), entries = registry.len(), "service ready");
        Ok(Self { config, registry })
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Loaded registry
    #[must_use]
    pub fn registry(&self) -> &MappingRegistry {
        &self.registry
    }

    /// Re-read the registry document
    ///
    /// # Errors
    ///
    /// Same as [`MappingRegistry::reload`]
    pub fn reload(&mut self) -> Result<()> {
        self.registry.reload()
    }

    /// Absolute form of a data path. Relative paths are taken relative to
    /// the registry document's directory, so entries stay valid whatever
    /// the working directory of later runs.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the current directory is needed and unavailable
    pub fn anchor(&self, data_path: &Path) -> Result<PathBuf> {
        let joined = if data_path.is_absolute() {
            data_path.to_path_buf()
        } else {
            self.config
                .registry_path
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(data_path)
        };
        std::path::absolute(&joined).map_err(|e| SyncError::io(&joined, e))
    }

    /// Full path of the spreadsheet paired with `data_path`, if registered
    #[must_use]
    pub fn spreadsheet_path_for(&self, data_path: &Path) -> Option<PathBuf> {
        let data_path = self.anchor(data_path).ok()?;
        self.registry
            .lookup_spreadsheet(&data_path)
            .map(|name| self.registry.spreadsheet_path(name))
    }

    /// Register a new data file: allocate a spreadsheet name, write an empty
    /// skeleton pair and insert the mapping. Returns the spreadsheet name.
    ///
    /// With `overwrite`, an existing registration for the same path is
    /// deleted first (old data file and spreadsheet included). The entry
    /// stores the [anchored](Self::anchor) path.
    ///
    /// # Errors
    ///
    /// - `SyncError::DuplicateMapping` if registered and not overwriting
    /// - `SyncError::NameResolution` if no unique name can be derived
    /// - `SyncError::Io` / `SyncError::Spreadsheet` if files cannot be written
    pub fn register(&mut self, data_path: &Path, overwrite: bool) -> Result<String> {
        let data_path = &self.anchor(data_path)?;
        naming::release_existing(&mut self.registry, data_path, overwrite)?;
        let name = NameAllocator::new(&self.registry, &self.config.spreadsheet_extension)
            .allocate(data_path)?;

        SkeletonFactory::new(&self.config).create_empty(data_path, &name)?;
        if let Err(e) = self.registry.insert(data_path, &name) {
            warn!(data_path = %data_path.display(), "registration failed, removing skeleton: {e}");
            for path in [data_path.to_path_buf(), self.registry.spreadsheet_path(&name)] {
                if let Err(cleanup) = file_system_adapter::remove_file_if_exists(&path) {
                    warn!(path = %path.display(), "cannot remove skeleton file: {cleanup}");
                }
            }
            return Err(e);
        }
        Ok(name)
    }

    /// Regenerate one registered data file
    ///
    /// # Errors
    ///
    /// - `SyncError::NotRegistered` if `data_path` has no mapping
    /// - any conversion error
    pub fn convert(&mut self, data_path: &Path) -> Result<()> {
        let data_path = &self.anchor(data_path)?;
        let name = self
            .registry
            .lookup_spreadsheet(data_path)
            .map(str::to_string)
            .ok_or_else(|| SyncError::NotRegistered {
                data_path: data_path.to_path_buf(),
            })?;
        ConversionEngine::new(&self.config).convert(&mut self.registry, data_path, &name)
    }

    /// Convert every pair that is forced, missing or stale
    pub fn synchronize_all(&mut self, force: bool) -> SyncReport {
        let engine = ConversionEngine::new(&self.config);
        sync::synchronize_all(&mut self.registry, &engine, force)
    }

    /// Freshness of every pair, without side effects
    #[must_use]
    pub fn status(&self) -> Vec<PairOutcome> {
        sync::status(&self.registry)
    }

    /// Registered data paths whose file is gone
    #[must_use]
    pub fn find_orphan_data_paths(&self) -> Vec<PathBuf> {
        self.registry.find_orphan_data_paths()
    }

    /// Unreferenced spreadsheet files
    ///
    /// # Errors
    ///
    /// See [`MappingRegistry::find_orphan_spreadsheets`]
    pub fn find_orphan_spreadsheets(&self) -> Result<Vec<PathBuf>> {
        self.registry
            .find_orphan_spreadsheets(&self.config.spreadsheet_extension)
    }

    /// Drop dangling mappings and their spreadsheets
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the registry cannot be saved
    pub fn delete_orphan_mappings(&mut self, data_paths: &[PathBuf]) -> Result<CleanupReport> {
        self.registry.delete_orphan_mappings(data_paths)
    }

    /// Delete unreferenced spreadsheets
    #[must_use]
    pub fn delete_orphan_spreadsheets(&self, paths: &[PathBuf]) -> CleanupReport {
        self.registry.delete_orphan_spreadsheets(paths)
    }
}
