//! CLI type definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `sheetsync` command-line interface
#[derive(Parser, Debug)]
#[command(
    name = "sheetsync",
    version,
    about = "Keep JSON data files in sync with their spreadsheet templates"
)]
pub struct SheetSyncCli {
    /// Configuration file (defaults to ./sheetsync.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode - only errors are logged
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Command to execute; the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<SheetSyncCommand>,
}

/// `sheetsync` subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SheetSyncCommand {
    /// Register a data file and create its empty template
    Add {
        /// Data file to create
        path: PathBuf,
        /// Fail instead of replacing an existing mapping
        #[arg(long)]
        no_overwrite: bool,
        /// Open the new spreadsheet afterwards
        #[arg(long)]
        open: bool,
    },

    /// Open the spreadsheet paired with a data file
    Open {
        /// Registered data file
        path: PathBuf,
        /// Register the file first if it has no mapping
        #[arg(long)]
        create: bool,
    },

    /// Regenerate stale data files
    Sync {
        /// Regenerate every data file regardless of digests
        #[arg(short, long)]
        force: bool,
    },

    /// Show which pairs are fresh or stale
    Status,

    /// Delete orphan mappings and unreferenced spreadsheets
    Clean {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Interactive menu
    Menu,
}
