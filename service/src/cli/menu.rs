//! Interactive menu loop

use super::app::{print_cleanup, print_report};
use crate::session::Session;
use colored::Colorize;
use sheetsync_core::Result;
use sheetsync_core::traits::{Launcher, Prompt};
use tracing::error;

/// Menu entries in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// Open the spreadsheet of a data file
    OpenDataFile,
    /// Register a new data file
    AddMapping,
    /// Regenerate stale data files
    UpdateAll,
    /// Regenerate every data file
    ForceUpdateAll,
    /// Delete orphan mappings and spreadsheets
    Clean,
    /// Open the registry document
    OpenRegistry,
    /// Open the log file
    OpenLog,
    /// Leave the menu
    Exit,
}

impl MenuItem {
    /// Every entry, in display order
    pub const ALL: [MenuItem; 8] = [
        MenuItem::OpenDataFile,
        MenuItem::AddMapping,
        MenuItem::UpdateAll,
        MenuItem::ForceUpdateAll,
        MenuItem::Clean,
        MenuItem::OpenRegistry,
        MenuItem::OpenLog,
        MenuItem::Exit,
    ];

    /// Label shown to the operator
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            MenuItem::OpenDataFile => "Open data file",
            MenuItem::AddMapping => "Add new mapping",
            MenuItem::UpdateAll => "Update all data files",
            MenuItem::ForceUpdateAll => "Force update all data files",
            MenuItem::Clean => "Delete orphan mappings and spreadsheets",
            MenuItem::OpenRegistry => "Open registry document",
            MenuItem::OpenLog => "Open log file",
            MenuItem::Exit => "Exit",
        }
    }
}

/// Show the menu until the operator exits or input ends.
///
/// A failing action is reported and the menu shown again.
///
/// # Errors
///
/// Only prompt failures end the loop with an error
pub fn run_menu<P: Prompt, L: Launcher>(session: &mut Session<P, L>) -> Result<()> {
    let labels: Vec<&str> = MenuItem::ALL.iter().map(|item| item.label()).collect();

    loop {
        let Some(index) = session.prompt_mut().choose("sheetsync", &labels)? else {
            return Ok(());
        };
        let Some(&item) = MenuItem::ALL.get(index) else {
            continue;
        };
        if item == MenuItem::Exit {
            return Ok(());
        }
        if let Err(e) = dispatch(session, item) {
            if matches!(e, sheetsync_core::SyncError::Prompt(_)) {
                return Err(e);
            }
            error!("{}: {e}", item.label());
            eprintln!("{} {e}", "✗".red());
        }
    }
}

fn dispatch<P: Prompt, L: Launcher>(session: &mut Session<P, L>, item: MenuItem) -> Result<()> {
    match item {
        MenuItem::OpenDataFile => {
            if let Some(sheet) = session.open_data_file()? {
                println!("{} opened {}", "✓".green(), sheet.display());
            }
        }
        MenuItem::AddMapping => {
            if let Some(name) = session.add_data_file()? {
                println!("{} created {name}", "✓".green());
            }
        }
        MenuItem::UpdateAll => print_report(&session.synchronize(false)?),
        MenuItem::ForceUpdateAll => print_report(&session.synchronize(true)?),
        MenuItem::Clean => print_cleanup(&session.clean()?),
        MenuItem::OpenRegistry => session.open_registry_document()?,
        MenuItem::OpenLog => session.open_log()?,
        MenuItem::Exit => {}
    }
    Ok(())
}
