//! Empty template creation
//!
//! A skeleton is a single-sheet workbook with the three header rows styled
//! and the type row restricted to the known tags, plus an empty data file.

use crate::converter::ConversionEngine;
use crate::file_system_adapter;
use crate::grid::{FIELD_ROW, TYPE_ROW};
use rust_xlsxwriter::{Color, DataValidation, Format, FormatAlign, FormatBorder, Workbook};
use sheetsync_core::{DataRecord, DataType, Result, SyncConfig, SyncError};
use std::path::Path;
use tracing::info;

const BANNER_ROW: u32 = 0;

/// Writes empty template/data file pairs
#[derive(Debug, Clone, Copy)]
pub struct SkeletonFactory<'a> {
    config: &'a SyncConfig,
}

impl<'a> SkeletonFactory<'a> {
    /// Factory using the skeleton settings of `config`
    #[must_use]
    pub fn new(config: &'a SyncConfig) -> Self {
        Self { config }
    }

    /// Create the spreadsheet `spreadsheet_name` in the spreadsheet directory
    /// and an empty record at `data_path`, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// - `SyncError::Spreadsheet` if the workbook cannot be built
    /// - `SyncError::Io` if either file cannot be written
    pub fn create_empty(&self, data_path: &Path, spreadsheet_name: &str) -> Result<()> {
        let spreadsheet = self.config.spreadsheet_path(spreadsheet_name);
        let workbook = self.build_workbook(&spreadsheet)?;
        file_system_adapter::write_atomic(&spreadsheet, &workbook)?;

        let record = ConversionEngine::new(self.config).render(&DataRecord::default())?;
        file_system_adapter::write_atomic(data_path, &record)?;

        info!(
            data_path = %data_path.display(),
            spreadsheet = %spreadsheet.display(),
            "skeleton created"
        );
        Ok(())
    }

    /// Workbook bytes for an empty template. `target` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Spreadsheet` if the workbook library rejects the layout
    pub fn build_workbook(&self, target: &Path) -> Result<Vec<u8>> {
        let xlsx_err = |e: rust_xlsxwriter::XlsxError| SyncError::spreadsheet(target, e.to_string());
        let skeleton = &self.config.skeleton;
        let fill = Color::RGB(skeleton.header_rgb()?);

        let banner = Format::new()
            .set_background_color(fill)
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center);
        let separator = Format::new()
            .set_background_color(fill)
            .set_border_left(FormatBorder::Thin)
            .set_border_top(FormatBorder::Thin)
            .set_border_right(FormatBorder::Thin)
            .set_border_bottom(FormatBorder::Medium);

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_row_format(BANNER_ROW, &banner)
            .map_err(xlsx_err)?;
        worksheet.set_row_format(TYPE_ROW, &banner).map_err(xlsx_err)?;
        worksheet
            .set_row_format(FIELD_ROW, &separator)
            .map_err(xlsx_err)?;

        let last_column = u16::try_from(skeleton.validation_columns.saturating_sub(1))
            .map_err(|e| SyncError::config(format!("validation column span too wide: {e}")))?;
        let tags = DataValidation::new()
            .allow_list_strings(&DataType::tag_names())
            .map_err(xlsx_err)?;
        worksheet
            .add_data_validation(TYPE_ROW, 0, TYPE_ROW, last_column, &tags)
            .map_err(xlsx_err)?;

        if skeleton.freeze_headers {
            worksheet
                .set_freeze_panes(FIELD_ROW + 1, 0)
                .map_err(xlsx_err)?;
        }

        workbook.save_to_buffer().map_err(xlsx_err)
    }
}
