//! Collaborator interfaces consumed by the interactive workflows
//!
//! The synchronization engine itself never prompts or launches anything;
//! only session-level workflows depend on these traits.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Asks the operator for paths and confirmations
pub trait Prompt {
    /// Ask for a file path. `Ok(None)` means the operator cancelled.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Prompt` if the input channel fails
    fn choose_path(&mut self, title: &str) -> Result<Option<PathBuf>>;

    /// Ask a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Prompt` if the input channel fails
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Pick one of `options`, returning its zero-based index. `Ok(None)`
    /// means the input was closed.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Prompt` if the input channel fails
    fn choose(&mut self, title: &str, options: &[&str]) -> Result<Option<usize>>;
}

/// Opens a file in its default external viewer
pub trait Launcher {
    /// Launch the viewer for `path` without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the viewer cannot be started
    fn open(&self, path: &Path) -> Result<()>;
}
