//! Integration tests for the registry document, naming and orphan handling

mod helpers;

use helpers::{TestResult, open_service};
use pretty_assertions::assert_eq;
use sheetsync_core::SyncError;
use sheetsync_service::registry::MappingRegistry;
use std::path::{Path, PathBuf};

#[test]
fn test_reads_existing_registry_document() -> TestResult {
    let dir = tempfile::tempdir()?;
    let excel = dir.path().join("excel");
    std::fs::create_dir_all(&excel)?;
    std::fs::write(
        dir.path().join("config.xml"),
        r#"<?xml version="1.0" encoding="utf-8"?>
<config>
  <mapping>
    <map hash="0123abcd">
      <json>data/items.bytes</json>
      <excel>items.xlsx</excel>
    </map>
    <map>
      <json>data/levels.bytes</json>
      <excel>levels.xlsx</excel>
    </map>
  </mapping>
</config>
"#,
    )?;

    let registry = MappingRegistry::load(dir.path().join("config.xml"), &excel)?;
    assert_eq!(
        registry.list_all(),
        vec![
            (PathBuf::from("data/items.bytes"), "items.xlsx".to_string()),
            (PathBuf::from("data/levels.bytes"), "levels.xlsx".to_string()),
        ]
    );
    assert_eq!(registry.stored_digest("items.xlsx"), Some("0123abcd"));
    assert_eq!(registry.stored_digest("levels.xlsx"), None);
    Ok(())
}

#[test]
fn test_saved_document_keeps_digests() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut sync = open_service(dir.path())?;
    let data = dir.path().join("items.bytes");
    sync.register(&data, false)?;
    sync.synchronize_all(false);

    let text = std::fs::read_to_string(sync.registry().path())?;
    assert!(text.contains("<mapping>"));
    assert!(text.contains("<excel>items.xlsx</excel>"));
    assert!(text.contains("hash=\""));

    let reloaded = MappingRegistry::load(sync.registry().path(), sync.registry().spreadsheet_dir())?;
    assert_eq!(
        reloaded.stored_digest("items.xlsx"),
        sync.registry().stored_digest("items.xlsx")
    );
    Ok(())
}

#[test]
fn test_malformed_document_is_reported() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.xml");
    std::fs::write(&path, "<config><mapping><map><json>a</json>")?;

    let err = MappingRegistry::load(&path, dir.path()).unwrap_err();
    assert!(matches!(err, SyncError::Registry { .. }));
    Ok(())
}

#[test]
fn test_registration_names_climb_directories() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut sync = open_service(dir.path())?;
    let root = dir.path();

    assert_eq!(sync.register(&root.join("a/b/c.bytes"), false)?, "c.xlsx");
    assert_eq!(sync.register(&root.join("x/b/c.bytes"), false)?, "b_c.xlsx");
    assert_eq!(sync.register(&root.join("y/x/b/c.bytes"), false)?, "x_b_c.xlsx");

    for name in ["c.xlsx", "b_c.xlsx", "x_b_c.xlsx"] {
        assert!(sync.registry().spreadsheet_path(name).exists(), "{name}");
    }
    Ok(())
}

#[test]
fn test_overwrite_replaces_previous_pair() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut sync = open_service(dir.path())?;
    let data = dir.path().join("items.bytes");
    sync.register(&data, false)?;
    std::fs::write(&data, b"generated earlier")?;

    let err = sync.register(&data, false).unwrap_err();
    assert!(matches!(err, SyncError::DuplicateMapping { .. }));
    assert_eq!(std::fs::read(&data)?, b"generated earlier");

    assert_eq!(sync.register(&data, true)?, "items.xlsx");
    assert_eq!(std::fs::read_to_string(&data)?, r#"{"Fields":[],"Rows":[]}"#);
    assert_eq!(sync.registry().len(), 1);
    Ok(())
}

#[test]
fn test_orphan_detection() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut sync = open_service(dir.path())?;
    let kept = dir.path().join("kept.bytes");
    let dropped = dir.path().join("dropped.bytes");
    sync.register(&kept, false)?;
    sync.register(&dropped, false)?;

    let stray = sync.registry().spreadsheet_path("stray.xlsx");
    std::fs::write(&stray, b"not registered")?;
    assert_eq!(sync.find_orphan_spreadsheets()?, vec![stray.clone()]);
    assert!(sync.find_orphan_data_paths().is_empty());

    std::fs::remove_file(&dropped)?;
    assert_eq!(sync.find_orphan_data_paths(), vec![dropped.clone()]);

    let report = sync.delete_orphan_mappings(&[dropped.clone()])?;
    assert_eq!(report.removed, vec![dropped]);
    assert!(!sync.registry().spreadsheet_path("dropped.xlsx").exists());
    assert!(sync.find_orphan_data_paths().is_empty());

    let report = sync.delete_orphan_spreadsheets(&[stray.clone()]);
    assert_eq!(report.removed, vec![stray.clone()]);
    assert!(!stray.exists());
    assert!(sync.find_orphan_spreadsheets()?.is_empty());
    Ok(())
}

#[test]
fn test_unregistering_exposes_spreadsheet_as_orphan() -> TestResult {
    let dir = tempfile::tempdir()?;
    let config = sheetsync_core::SyncConfig::default().resolve_paths(dir.path());
    config.ensure_layout()?;
    let mut registry = MappingRegistry::load(&config.registry_path, &config.spreadsheet_dir)?;
    registry.insert(dir.path().join("a.bytes"), "a.xlsx")?;
    std::fs::write(registry.spreadsheet_path("a.xlsx"), b"x")?;
    assert!(registry.find_orphan_spreadsheets("xlsx")?.is_empty());

    registry.remove(Path::new(&dir.path().join("a.bytes")))?;
    assert_eq!(
        registry.find_orphan_spreadsheets("xlsx")?,
        vec![registry.spreadsheet_path("a.xlsx")]
    );
    Ok(())
}

#[test]
fn test_referenced_spreadsheet_is_never_deleted() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut sync = open_service(dir.path())?;
    sync.register(&dir.path().join("live.bytes"), false)?;
    let live = sync.registry().spreadsheet_path("live.xlsx");

    let report = sync.delete_orphan_spreadsheets(&[live.clone()]);
    assert!(report.removed.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert!(live.exists());
    Ok(())
}
