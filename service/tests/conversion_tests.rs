//! Integration tests for template reading and data file generation

mod helpers;

use helpers::{Cell, TestResult, write_people, write_template};
use pretty_assertions::assert_eq;
use sheetsync_core::{DataRecord, SyncConfig, SyncError};
use sheetsync_service::ConversionEngine;
use sheetsync_service::grid::{Grid, GridSchema};
use sheetsync_service::registry::MappingRegistry;
use sheetsync_core::DataType;
use std::path::Path;

fn setup(dir: &Path) -> Result<(SyncConfig, MappingRegistry), Box<dyn std::error::Error>> {
    let config = SyncConfig::default().resolve_paths(dir);
    config.ensure_layout()?;
    let registry = MappingRegistry::load(&config.registry_path, &config.spreadsheet_dir)?;
    Ok((config, registry))
}

#[test]
fn test_typed_row_converts_to_expected_json() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (config, mut registry) = setup(dir.path())?;
    let data_path = dir.path().join("people.bytes");
    registry.insert(&data_path, "people.xlsx")?;
    write_people(
        &config.spreadsheet_path("people.xlsx"),
        &[vec![Cell::Num(7.0), Cell::Text("Ann"), Cell::Num(3.0), Cell::Blank]],
    )?;

    ConversionEngine::new(&config).convert(&mut registry, &data_path, "people.xlsx")?;

    assert_eq!(
        std::fs::read_to_string(&data_path)?,
        r#"{"Fields":["id","name","score","active"],"Rows":[[7,"Ann",3.0,false]]}"#
    );
    assert!(registry.is_fresh("people.xlsx")?);
    Ok(())
}

#[test]
fn test_cells_are_coerced_by_column_type() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mixed.xlsx");
    write_people(
        &path,
        &[
            vec![Cell::Text("12"), Cell::Num(5.0), Cell::Text("2.5"), Cell::Text("True")],
            vec![Cell::Blank, Cell::Text("quote \" and \\"), Cell::Blank, Cell::Bool(true)],
        ],
    )?;

    let record = ConversionEngine::new(&SyncConfig::default()).build_record(&path)?;
    let json = serde_json::to_string(&record)?;
    assert_eq!(
        json,
        r#"{"Fields":["id","name","score","active"],"Rows":[[12,"5",2.5,true],[0,"quote \" and \\",0.0,true]]}"#
    );
    Ok(())
}

#[test]
fn test_blank_rows_are_skipped() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("gaps.xlsx");
    write_people(
        &path,
        &[
            vec![Cell::Num(1.0), Cell::Text("a")],
            vec![],
            vec![Cell::Num(3.0), Cell::Text("c")],
        ],
    )?;

    let record = ConversionEngine::new(&SyncConfig::default()).build_record(&path)?;
    let ids: Vec<_> = record.rows.iter().map(|r| r[0].clone()).collect();
    assert_eq!(ids, vec![serde_json::json!(1), serde_json::json!(3)]);
    assert!(record.rows.iter().all(|r| r.len() == record.field_count()));
    Ok(())
}

#[test]
fn test_unknown_type_leaves_previous_data_file_untouched() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (config, mut registry) = setup(dir.path())?;
    let data_path = dir.path().join("items.bytes");
    registry.insert(&data_path, "items.xlsx")?;
    std::fs::write(&data_path, b"previous content")?;
    write_template(
        &config.spreadsheet_path("items.xlsx"),
        &["Integer", "Unknown"],
        &["id", "label"],
        &[vec![Cell::Num(1.0), Cell::Text("x")]],
    )?;

    let err = ConversionEngine::new(&config)
        .convert(&mut registry, &data_path, "items.xlsx")
        .unwrap_err();

    assert!(matches!(err, SyncError::UnknownType { column: 1, .. }));
    assert_eq!(std::fs::read(&data_path)?, b"previous content");
    assert_eq!(registry.stored_digest("items.xlsx"), None);
    Ok(())
}

#[test]
fn test_unrecognised_and_missing_tags_are_unknown_types() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tags.xlsx");

    write_template(&path, &["Integer", "Text"], &["id", "label"], &[])?;
    let err = GridSchema::read(&Grid::open(&path)?).unwrap_err();
    assert!(matches!(err, SyncError::UnknownType { column: 1, ref tag } if tag == "Text"));

    write_template(&path, &["Integer"], &["id", "label"], &[])?;
    let err = GridSchema::read(&Grid::open(&path)?).unwrap_err();
    assert!(matches!(err, SyncError::UnknownType { column: 1, .. }));
    Ok(())
}

#[test]
fn test_format_error_names_the_cell() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bad.xlsx");
    write_people(
        &path,
        &[
            vec![Cell::Num(1.0)],
            vec![Cell::Text("abc")],
        ],
    )?;

    let err = ConversionEngine::new(&SyncConfig::default())
        .build_record(&path)
        .unwrap_err();
    assert_eq!(err.to_string(), "cell A5: cannot read 'abc' as Integer");
    Ok(())
}

#[test]
fn test_schema_reads_header_rows() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("schema.xlsx");
    write_people(&path, &[])?;

    let schema = GridSchema::read(&Grid::open(&path)?)?;
    assert_eq!(schema.fields, vec!["id", "name", "score", "active"]);
    assert_eq!(
        schema.types,
        vec![DataType::Integer, DataType::String, DataType::Float, DataType::Bool]
    );

    let record = ConversionEngine::new(&SyncConfig::default()).build_record(&path)?;
    assert_eq!(
        record,
        DataRecord {
            fields: schema.fields,
            rows: Vec::new(),
        }
    );
    Ok(())
}

#[test]
fn test_gap_in_field_row_is_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("gap.xlsx");
    write_template(
        &path,
        &["Integer", "Integer", "Integer"],
        &["a", "", "c"],
        &[],
    )?;

    let err = GridSchema::read(&Grid::open(&path)?).unwrap_err();
    assert!(matches!(err, SyncError::Spreadsheet { .. }));
    Ok(())
}

#[test]
fn test_not_a_workbook() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("fake.xlsx");
    std::fs::write(&path, b"definitely not a zip archive")?;

    let err = Grid::open(&path).unwrap_err();
    assert!(matches!(err, SyncError::Spreadsheet { .. }));
    Ok(())
}
