//! `sheetsync` CLI application

use super::menu::run_menu;
use super::types::{SheetSyncCli, SheetSyncCommand};
use crate::config::{DEFAULT_CONFIG_FILE, load_config};
use crate::console::{ConsolePrompt, FixedAnswer};
use crate::launcher::SystemLauncher;
use crate::service::SheetSync;
use crate::session::{CleanSummary, Session};
use clap::Parser;
use colored::Colorize;
use sheetsync_core::traits::Prompt;
use sheetsync_core::{CleanupReport, PairOutcome, PairStatus, Result, SyncError, SyncReport};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Main `sheetsync` CLI application
pub struct SheetSyncApp {
    cli: SheetSyncCli,
}

impl SheetSyncApp {
    /// Create the application from command line arguments
    #[must_use]
    pub fn from_args() -> Self {
        Self {
            cli: SheetSyncCli::parse(),
        }
    }

    /// Create the application with an explicit CLI configuration
    #[must_use]
    pub fn new(cli: SheetSyncCli) -> Self {
        Self { cli }
    }

    /// Run the selected command. Returns a failure exit code when a batch
    /// finished with failed pairs.
    ///
    /// # Errors
    ///
    /// Returns error if configuration, registry loading or the command fails
    pub fn run(self) -> Result<ExitCode> {
        let config_path = self
            .cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let config = load_config(&config_path)?;
        self.init_logging(config.log_path.as_deref());
        info!(config = %config_path.display(), "starting sheetsync");

        let result = SheetSync::open(config).and_then(|sync| self.execute_command(sync));
        match result {
            Ok(code) => Ok(code),
            Err(err) => {
                error!("Command failed: {err}");
                if !self.cli.quiet {
                    eprintln!("{}: {err}", "Error".red());
                }
                Err(err)
            }
        }
    }

    /// Configure tracing based on CLI flags; `RUST_LOG` takes precedence.
    /// When a log file is configured, a second plain-text layer appends to it.
    fn init_logging(&self, log_path: Option<&Path>) {
        let level = if self.cli.quiet {
            "error"
        } else if self.cli.verbose {
            "debug"
        } else {
            "info"
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        let mut file_error = None;
        let file_layer = log_path.and_then(|path| match open_log_file(path) {
            Ok(file) => Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            ),
            Err(e) => {
                file_error = Some(e);
                None
            }
        });

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .with(file_layer)
            .try_init();

        if let Some(e) = file_error {
            warn!("file logging disabled: {e}");
        }
    }

    fn execute_command(&self, sync: SheetSync) -> Result<ExitCode> {
        let command = self.cli.command.clone().unwrap_or(SheetSyncCommand::Menu);
        match command {
            SheetSyncCommand::Add {
                path,
                no_overwrite,
                open,
            } => {
                let path = from_working_dir(path)?;
                let mut session = bind_session(sync, FixedAnswer(true));
                let name = session.register(&path, !no_overwrite)?;
                println!("{} {} -> {name}", "✓".green(), path.display());
                if open {
                    session.open_data_path(&path)?;
                }
                Ok(ExitCode::SUCCESS)
            }
            SheetSyncCommand::Open { path, create } => {
                let path = from_working_dir(path)?;
                let mut session = bind_session(sync, FixedAnswer(create));
                match session.open_data_path(&path)? {
                    Some(sheet) => {
                        println!("{} opened {}", "✓".green(), sheet.display());
                        Ok(ExitCode::SUCCESS)
                    }
                    None => Err(SyncError::NotRegistered { data_path: path }),
                }
            }
            SheetSyncCommand::Sync { force } => {
                let report = bind_session(sync, FixedAnswer(false)).synchronize(force)?;
                print_report(&report);
                Ok(if report.failed() == 0 {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                })
            }
            SheetSyncCommand::Status => {
                print_status(&sync.status());
                Ok(ExitCode::SUCCESS)
            }
            SheetSyncCommand::Clean { yes } => {
                let summary = if yes {
                    bind_session(sync, FixedAnswer(true)).clean()?
                } else {
                    bind_session(sync, ConsolePrompt::new()?).clean()?
                };
                print_cleanup(&summary);
                Ok(ExitCode::SUCCESS)
            }
            SheetSyncCommand::Menu => {
                let mut session = bind_session(sync, ConsolePrompt::new()?);
                run_menu(&mut session)?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn bind_session<P: Prompt>(sync: SheetSync, prompt: P) -> Session<P, SystemLauncher> {
    Session::new(sync, prompt, SystemLauncher)
}

/// Paths typed on the command line are relative to where the command runs
fn from_working_dir(path: PathBuf) -> Result<PathBuf> {
    std::path::absolute(&path).map_err(|e| SyncError::io(&path, e))
}

fn open_log_file(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Print a batch summary
pub(crate) fn print_report(report: &SyncReport) {
    for outcome in &report.outcomes {
        if let PairStatus::Failed(reason) = &outcome.status {
            println!(
                "{} {} ({}): {reason}",
                "✗".red(),
                outcome.data_path.display(),
                outcome.spreadsheet_name
            );
        }
    }
    println!(
        "{} converted, {} up to date, {} failed",
        report.converted().to_string().green(),
        report.fresh(),
        if report.failed() == 0 {
            "0".normal()
        } else {
            report.failed().to_string().red()
        }
    );
}

/// Print the freshness listing
pub(crate) fn print_status(outcomes: &[PairOutcome]) {
    if outcomes.is_empty() {
        println!("No mappings registered");
        return;
    }
    for outcome in outcomes {
        let status = match &outcome.status {
            PairStatus::Fresh => "fresh".green(),
            PairStatus::Stale => "stale".yellow(),
            PairStatus::Converted => "converted".green(),
            PairStatus::Failed(reason) => format!("error: {reason}").red(),
        };
        println!(
            "{:<10} {} -> {}",
            status,
            outcome.data_path.display(),
            outcome.spreadsheet_name
        );
    }
}

/// Print what a cleanup removed
pub(crate) fn print_cleanup(summary: &CleanSummary) {
    print_cleanup_group("mappings", &summary.mappings);
    print_cleanup_group("spreadsheets", &summary.spreadsheets);
}

fn print_cleanup_group(what: &str, report: &CleanupReport) {
    for path in &report.removed {
        println!("{} removed {}", "✓".green(), path.display());
    }
    for (path, reason) in &report.failed {
        println!("{} {}: {reason}", "✗".red(), path.display());
    }
    if !report.removed.is_empty() || !report.failed.is_empty() {
        println!(
            "{what}: {} removed, {} failed",
            report.removed.len(),
            report.failed.len()
        );
    }
}
