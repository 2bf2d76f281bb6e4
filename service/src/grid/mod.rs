//! Read-only view of a template workbook
//!
//! Templates have a fixed layout on their first sheet:
//!
//! | row | content                              |
//! |-----|--------------------------------------|
//! | 0   | banner, ignored                      |
//! | 1   | one type tag per column              |
//! | 2   | one field name per column            |
//! | 3+  | records                              |
//!
//! Cells are addressed by absolute zero-based coordinates regardless of
//! where the sheet's used range starts.

mod coerce;
mod schema;

pub use coerce::{cell_text, coerce, is_blank};
pub use schema::GridSchema;

use crate::hasher;
use calamine::{Data, Range, Reader, Xlsx};
use sheetsync_core::{Result, SyncError};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Row holding the type tags
pub const TYPE_ROW: u32 = 1;
/// Row holding the field names
pub const FIELD_ROW: u32 = 2;
/// First record row
pub const DATA_START_ROW: u32 = 3;

static EMPTY: Data = Data::Empty;

/// First worksheet of a workbook
#[derive(Debug, Clone)]
pub struct Grid {
    path: PathBuf,
    digest: String,
    range: Range<Data>,
}

impl Grid {
    /// Load the first worksheet of an xlsx file
    ///
    /// # Errors
    ///
    /// - `SyncError::Io` if the file cannot be read
    /// - `SyncError::Spreadsheet` if it is not a readable workbook or has no sheet
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| SyncError::io(path, e))?;
        let digest = hasher::digest_bytes(&bytes);
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| SyncError::spreadsheet(path, format!("cannot parse workbook: {e}")))?;

        let first = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| SyncError::spreadsheet(path, "workbook has no sheets"))?;
        let range = workbook
            .worksheet_range(&first)
            .map_err(|e| SyncError::spreadsheet(path, format!("cannot read sheet '{first}': {e}")))?;

        Ok(Self {
            path: path.to_path_buf(),
            digest,
            range,
        })
    }

    /// Workbook this grid was read from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Digest of the exact bytes the grid was parsed from
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Cell at an absolute position; cells outside the used range are empty
    #[must_use]
    pub fn cell(&self, row: u32, column: u32) -> &Data {
        self.range.get_value((row, column)).unwrap_or(&EMPTY)
    }

    /// Last used row, if the sheet has any content
    #[must_use]
    pub fn last_row(&self) -> Option<u32> {
        self.range.end().map(|(row, _)| row)
    }

    /// Last used column, if the sheet has any content
    #[must_use]
    pub fn last_column(&self) -> Option<u32> {
        self.range.end().map(|(_, column)| column)
    }
}
