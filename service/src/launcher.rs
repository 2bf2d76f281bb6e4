//! Default-application launcher

use sheetsync_core::traits::Launcher;
use sheetsync_core::{Result, SyncError};
use std::path::Path;
use tracing::debug;

/// Opens files with the desktop's default application
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "launching viewer");
        open::that(path).map_err(|e| SyncError::io(path, e))
    }
}
