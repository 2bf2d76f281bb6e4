//! Fixture builders shared by the integration tests

#![allow(dead_code)]

use rust_xlsxwriter::{Format, Workbook};
use sheetsync_core::SyncConfig;
use sheetsync_service::SheetSync;
use std::path::Path;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// One authored cell in a fixture template
#[derive(Debug, Clone)]
pub enum Cell {
    Num(f64),
    Text(&'static str),
    Bool(bool),
    Blank,
}

/// Write a template with the standard three header rows
pub fn write_template(
    path: &Path,
    types: &[&str],
    fields: &[&str],
    rows: &[Vec<Cell>],
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let banner = Format::new().set_bold();
    sheet.write_with_format(0, 0, "fixture banner", &banner)?;

    for (col, tag) in (0u16..).zip(types) {
        if !tag.is_empty() {
            sheet.write_string(1, col, *tag)?;
        }
    }
    for (col, field) in (0u16..).zip(fields) {
        if !field.is_empty() {
            sheet.write_string(2, col, *field)?;
        }
    }
    for (row, cells) in (3u32..).zip(rows) {
        for (col, cell) in (0u16..).zip(cells) {
            match cell {
                Cell::Num(n) => {
                    sheet.write_number(row, col, *n)?;
                }
                Cell::Text(s) => {
                    sheet.write_string(row, col, *s)?;
                }
                Cell::Bool(b) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                Cell::Blank => {}
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// The four-column template used across tests
pub fn write_people(path: &Path, rows: &[Vec<Cell>]) -> Result<(), Box<dyn std::error::Error>> {
    write_template(
        path,
        &["Integer", "String", "Float", "Bool"],
        &["id", "name", "score", "active"],
        rows,
    )
}

/// A service rooted at `dir` with default settings
pub fn open_service(dir: &Path) -> Result<SheetSync, Box<dyn std::error::Error>> {
    Ok(SheetSync::open(SyncConfig::default().resolve_paths(dir))?)
}
