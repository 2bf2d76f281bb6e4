//! `sheetsync` command-line interface

mod app;
mod menu;
mod types;

pub use app::SheetSyncApp;
pub use menu::{MenuItem, run_menu};
pub use types::{SheetSyncCli, SheetSyncCommand};

use sheetsync_core::Result;
use std::process::ExitCode;

/// Main entry point for the CLI
///
/// # Errors
/// Returns error if configuration loading or the command fails
pub fn run() -> Result<ExitCode> {
    SheetSyncApp::from_args().run()
}
