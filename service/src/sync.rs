//! Batch synchronization across every registered pair

use crate::converter::ConversionEngine;
use crate::registry::MappingRegistry;
use sheetsync_core::{PairOutcome, PairStatus, Result, SyncReport};
use std::path::Path;
use tracing::{error, info, warn};

/// Convert every pair that is forced, missing its data file, or stale.
///
/// Pairs are visited in registry order. A failing pair is logged and
/// recorded in the report; the remaining pairs are still processed.
pub fn synchronize_all(
    registry: &mut MappingRegistry,
    engine: &ConversionEngine<'_>,
    force: bool,
) -> SyncReport {
    let mut report = SyncReport::default();

    for (data_path, spreadsheet_name) in registry.list_all() {
        let status = match sync_pair(registry, engine, &data_path, &spreadsheet_name, force) {
            Ok(status) => status,
            Err(e) => {
                if e.is_content_error() {
                    warn!(
                        data_path = %data_path.display(),
                        spreadsheet = %spreadsheet_name,
                        "spreadsheet rejected: {e}"
                    );
                } else {
                    error!(
                        data_path = %data_path.display(),
                        spreadsheet = %spreadsheet_name,
                        "conversion failed: {e}"
                    );
                }
                PairStatus::Failed(e.to_string())
            }
        };
        report.outcomes.push(PairOutcome {
            data_path,
            spreadsheet_name,
            status,
        });
    }

    info!(
        converted = report.converted(),
        fresh = report.fresh(),
        failed = report.failed(),
        "synchronization finished"
    );
    report
}

fn sync_pair(
    registry: &mut MappingRegistry,
    engine: &ConversionEngine<'_>,
    data_path: &Path,
    spreadsheet_name: &str,
    force: bool,
) -> Result<PairStatus> {
    let needed = force
        || !data_path.exists()
        || !registry.check_and_update_digest(spreadsheet_name, false)?;
    if !needed {
        return Ok(PairStatus::Fresh);
    }
    engine.convert(registry, data_path, spreadsheet_name)?;
    Ok(PairStatus::Converted)
}

/// Freshness of every pair without converting or saving anything
#[must_use]
pub fn status(registry: &MappingRegistry) -> Vec<PairOutcome> {
    registry
        .entries()
        .map(|entry| {
            let status = if entry.data_path.exists() {
                match registry.is_fresh(&entry.spreadsheet_name) {
                    Ok(true) => PairStatus::Fresh,
                    Ok(false) => PairStatus::Stale,
                    Err(e) if e.is_not_found() => PairStatus::Failed(format!(
                        "spreadsheet {} is missing",
                        entry.spreadsheet_name
                    )),
                    Err(e) => PairStatus::Failed(e.to_string()),
                }
            } else {
                PairStatus::Stale
            };
            PairOutcome {
                data_path: entry.data_path.clone(),
                spreadsheet_name: entry.spreadsheet_name.clone(),
                status,
            }
        })
        .collect()
}
