//! Spreadsheet to data file conversion

use crate::file_system_adapter;
use crate::grid::{DATA_START_ROW, Grid, GridSchema, coerce, is_blank};
use crate::registry::MappingRegistry;
use sheetsync_core::{CellRef, DataRecord, Result, SyncConfig};
use std::path::Path;
use tracing::{debug, info};

/// Converts template workbooks into `DataRecord` JSON files
#[derive(Debug, Clone, Copy)]
pub struct ConversionEngine<'a> {
    config: &'a SyncConfig,
}

impl<'a> ConversionEngine<'a> {
    /// Engine using the output settings of `config`
    #[must_use]
    pub fn new(config: &'a SyncConfig) -> Self {
        Self { config }
    }

    /// Read a workbook into a record without writing anything.
    ///
    /// Records come from rows 3 onward in ascending order; rows whose
    /// schema columns are all blank are skipped.
    ///
    /// # Errors
    ///
    /// Any `SyncError` from opening the workbook, reading its header rows
    /// or coercing a cell
    pub fn build_record(&self, spreadsheet: &Path) -> Result<DataRecord> {
        self.read_workbook(spreadsheet).map(|(record, _)| record)
    }

    /// Record plus the digest of the bytes it was built from
    fn read_workbook(&self, spreadsheet: &Path) -> Result<(DataRecord, String)> {
        let grid = Grid::open(spreadsheet)?;
        let schema = GridSchema::read(&grid)?;

        let mut rows = Vec::new();
        if let Some(last_row) = grid.last_row() {
            for row in DATA_START_ROW..=last_row {
                let cells: Vec<_> = (0u32..)
                    .zip(&schema.types)
                    .map(|(column, ty)| (column, *ty, grid.cell(row, column)))
                    .collect();
                if cells.iter().all(|(_, _, cell)| is_blank(cell)) {
                    continue;
                }
                let values = cells
                    .into_iter()
                    .map(|(column, ty, cell)| coerce(cell, ty, CellRef::new(row, column)))
                    .collect::<Result<Vec<_>>>()?;
                rows.push(values);
            }
        }

        debug!(
            spreadsheet = %spreadsheet.display(),
            fields = schema.field_count(),
            rows = rows.len(),
            "workbook read"
        );
        let record = DataRecord {
            fields: schema.fields,
            rows,
        };
        Ok((record, grid.digest().to_string()))
    }

    /// Serialize a record, compact or indented per configuration
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Serialization` if JSON encoding fails
    pub fn render(&self, record: &DataRecord) -> Result<Vec<u8>> {
        let bytes = if self.config.output.pretty {
            serde_json::to_vec_pretty(record)?
        } else {
            serde_json::to_vec(record)?
        };
        Ok(bytes)
    }

    /// Regenerate `data_path` from the named spreadsheet, then record the
    /// digest of the workbook bytes that were converted. A save made while
    /// the conversion runs therefore stays stale for the next batch.
    ///
    /// The data file is written only after the whole record is assembled,
    /// so a failure leaves the previous file untouched.
    ///
    /// # Errors
    ///
    /// Any `SyncError` from reading, rendering, writing or saving the digest
    pub fn convert(
        &self,
        registry: &mut MappingRegistry,
        data_path: &Path,
        spreadsheet_name: &str,
    ) -> Result<()> {
        let spreadsheet = registry.spreadsheet_path(spreadsheet_name);
        let (record, digest) = self.read_workbook(&spreadsheet)?;
        let bytes = self.render(&record)?;
        file_system_adapter::write_atomic(data_path, &bytes)?;
        registry.record_digest(spreadsheet_name, digest)?;
        info!(
            data_path = %data_path.display(),
            spreadsheet = spreadsheet_name,
            rows = record.rows.len(),
            "data file regenerated"
        );
        Ok(())
    }
}
