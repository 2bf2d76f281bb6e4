//! Operator workflows
//!
//! Each workflow reloads the registry first, asks the prompt for whatever it
//! needs and hands files to the launcher. The registry operations themselves
//! live on [`SheetSync`].

use crate::service::SheetSync;
use sheetsync_core::traits::{Launcher, Prompt};
use sheetsync_core::{CleanupReport, Result, SyncError, SyncReport};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Result of [`Session::clean`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanSummary {
    /// Dangling mappings handled
    pub mappings: CleanupReport,
    /// Unreferenced spreadsheets handled
    pub spreadsheets: CleanupReport,
}

/// A service bound to a prompt and a launcher
pub struct Session<P, L> {
    sync: SheetSync,
    prompt: P,
    launcher: L,
}

impl<P: Prompt, L: Launcher> Session<P, L> {
    /// Bind collaborators to a service
    pub fn new(sync: SheetSync, prompt: P, launcher: L) -> Self {
        Self {
            sync,
            prompt,
            launcher,
        }
    }

    /// Underlying service
    pub fn sync(&self) -> &SheetSync {
        &self.sync
    }

    /// Prompt used by the workflows
    pub fn prompt_mut(&mut self) -> &mut P {
        &mut self.prompt
    }

    /// Ask for a data file and open its spreadsheet. Returns the opened
    /// spreadsheet, or `None` if the operator cancelled or declined.
    ///
    /// # Errors
    ///
    /// Any registration, prompt or launcher error
    pub fn open_data_file(&mut self) -> Result<Option<PathBuf>> {
        self.sync.reload()?;
        let Some(data_path) = self.prompt.choose_path("Open data file")? else {
            return Ok(None);
        };
        self.open_data_path(&data_path)
    }

    /// Open the spreadsheet paired with `data_path`. An unregistered path is
    /// registered (overwriting the data file) if the operator agrees.
    ///
    /// # Errors
    ///
    /// Any registration, prompt or launcher error
    pub fn open_data_path(&mut self, data_path: &Path) -> Result<Option<PathBuf>> {
        if self.sync.spreadsheet_path_for(data_path).is_none() {
            let question = format!(
                "No mapping for {}. Create one and overwrite the file?",
                data_path.display()
            );
            if !self.prompt.confirm(&question)? {
                return Ok(None);
            }
            self.register(data_path, true)?;
        }

        let spreadsheet = self
            .sync
            .spreadsheet_path_for(data_path)
            .ok_or_else(|| SyncError::NotRegistered {
                data_path: data_path.to_path_buf(),
            })?;
        self.launcher.open(&spreadsheet)?;
        Ok(Some(spreadsheet))
    }

    /// Ask where to save a new data file, register it with a fresh skeleton
    /// and offer to open the spreadsheet. Returns the spreadsheet name, or
    /// `None` if the operator cancelled.
    ///
    /// # Errors
    ///
    /// Any registration, prompt or launcher error
    pub fn add_data_file(&mut self) -> Result<Option<String>> {
        self.sync.reload()?;
        let Some(data_path) = self.prompt.choose_path("Save new data file as")? else {
            return Ok(None);
        };
        let name = self.register(&data_path, true)?;

        if self.prompt.confirm("Open the spreadsheet now?")? {
            self.launcher
                .open(&self.sync.registry().spreadsheet_path(&name))?;
        }
        Ok(Some(name))
    }

    /// Register `data_path` and log the outcome either way
    ///
    /// # Errors
    ///
    /// See [`SheetSync::register`]
    pub fn register(&mut self, data_path: &Path, overwrite: bool) -> Result<String> {
        match self.sync.register(data_path, overwrite) {
            Ok(name) => {
                info!(data_path = %data_path.display(), spreadsheet = %name, "mapping created");
                Ok(name)
            }
            Err(e) => {
                error!(data_path = %data_path.display(), "mapping creation failed: {e}");
                Err(e)
            }
        }
    }

    /// Reload and run the batch
    ///
    /// # Errors
    ///
    /// Returns an error only if the registry cannot be reloaded; per-pair
    /// failures are in the report
    pub fn synchronize(&mut self, force: bool) -> Result<SyncReport> {
        self.sync.reload()?;
        Ok(self.sync.synchronize_all(force))
    }

    /// Find both kinds of orphan and delete each group after confirmation
    ///
    /// # Errors
    ///
    /// Prompt failures, scan failures, or a registry that cannot be saved
    pub fn clean(&mut self) -> Result<CleanSummary> {
        self.sync.reload()?;
        let mut summary = CleanSummary::default();

        info!("scanning for orphan mappings");
        let mappings = self.sync.find_orphan_data_paths();
        if mappings.is_empty() {
            info!("no orphan mappings");
        } else {
            for path in &mappings {
                info!(data_path = %path.display(), "orphan mapping");
            }
            if self
                .prompt
                .confirm("Delete these mappings and their spreadsheets?")?
            {
                summary.mappings = self.sync.delete_orphan_mappings(&mappings)?;
            }
        }

        info!("scanning for orphan spreadsheets");
        let spreadsheets = self.sync.find_orphan_spreadsheets()?;
        if spreadsheets.is_empty() {
            info!("no orphan spreadsheets");
        } else {
            for path in &spreadsheets {
                info!(path = %path.display(), "orphan spreadsheet");
            }
            if self.prompt.confirm("Delete these spreadsheets?")? {
                summary.spreadsheets = self.sync.delete_orphan_spreadsheets(&spreadsheets);
            }
        }

        Ok(summary)
    }

    /// Open the registry document, writing an empty one first if needed
    ///
    /// # Errors
    ///
    /// IO or launcher errors
    pub fn open_registry_document(&mut self) -> Result<()> {
        self.sync.reload()?;
        let registry = self.sync.registry();
        if !registry.path().exists() {
            registry.save()?;
        }
        self.launcher.open(registry.path())
    }

    /// Open the log file
    ///
    /// # Errors
    ///
    /// `SyncError::Config` if file logging is disabled, otherwise launcher errors
    pub fn open_log(&mut self) -> Result<()> {
        let log_path = self
            .sync
            .config()
            .log_path
            .clone()
            .ok_or_else(|| SyncError::config("file logging is disabled"))?;
        self.launcher.open(&log_path)
    }
}
