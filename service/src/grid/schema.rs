//! Column schema from the type and field header rows

use super::{FIELD_ROW, Grid, TYPE_ROW, cell_text, is_blank};
use sheetsync_core::{DataType, Result, SyncError};

/// Field names and declared types of a template, in column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSchema {
    /// Names from the field row
    pub fields: Vec<String>,
    /// Tags from the type row, one per field
    pub types: Vec<DataType>,
}

impl GridSchema {
    /// Read the header rows.
    ///
    /// The field count is the run of non-blank field-row cells starting at
    /// column 0. A named column after a blank one is rejected rather than
    /// silently dropped.
    ///
    /// # Errors
    ///
    /// - `SyncError::Spreadsheet` if the field row has a gap
    /// - `SyncError::UnknownType` if any field's tag is `Unknown` or unrecognised
    pub fn read(grid: &Grid) -> Result<Self> {
        let last_column = grid.last_column().unwrap_or(0);

        let mut fields = Vec::new();
        let mut column = 0;
        while column <= last_column && !is_blank(grid.cell(FIELD_ROW, column)) {
            fields.push(cell_text(grid.cell(FIELD_ROW, column)).trim().to_string());
            column += 1;
        }
        if let Some(stray) = (column..=last_column).find(|&c| !is_blank(grid.cell(FIELD_ROW, c))) {
            return Err(SyncError::spreadsheet(
                grid.path(),
                format!(
                    "field row has a gap: column {} is blank but column {} is named",
                    column + 1,
                    stray + 1
                ),
            ));
        }

        let mut types = Vec::with_capacity(fields.len());
        for index in 0..fields.len() {
            let column = u32::try_from(index).unwrap_or(u32::MAX);
            let tag = cell_text(grid.cell(TYPE_ROW, column));
            match tag.parse::<DataType>() {
                Ok(DataType::Unknown) | Err(_) => {
                    return Err(SyncError::UnknownType {
                        column: index,
                        tag: tag.trim().to_string(),
                    });
                }
                Ok(ty) => types.push(ty),
            }
        }

        Ok(Self { fields, types })
    }

    /// Number of columns every record carries
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}
