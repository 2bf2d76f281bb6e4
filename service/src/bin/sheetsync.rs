//! `sheetsync` command-line interface
//!
//! Registers data files, creates their spreadsheet templates and regenerates
//! the data files when the templates change.

use sheetsync_service::cli;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    Ok(cli::run()?)
}
