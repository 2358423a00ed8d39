mod common;

use std::path::Path;

use tempfile::TempDir;

use common::*;
use jobtrack::{persist, ApplicationStatus, TableError, TableStore, WriteMode, XlsxTable};

#[test]
fn test_overwrite_then_append_merges_by_identity() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("apps.xlsx");
    let table = XlsxTable::default();

    let initial = vec![
        record("Stryker", "Software Intern", "2025-09-01"),
        record("Citadel", "Quant Intern", "2025-09-03"),
    ];
    let outcome = persist(&table, &initial, &path, WriteMode::Overwrite).unwrap();
    assert_eq!(outcome.rows_written, 2);

    let mut repeat = record("STRYKER ", "software intern", "2025-09-01");
    repeat.status = ApplicationStatus::Interview;
    let incoming = vec![repeat, record("Acme", "Backend Intern", "2025-09-05")];
    let outcome = persist(&table, &incoming, &path, WriteMode::Append).unwrap();
    assert_eq!(outcome.rows_written, 3);
    assert_eq!(outcome.rows_added, 1);
    assert_eq!(outcome.duplicates_skipped, 1);

    let rows = table.read_table(&path).unwrap();
    let companies: Vec<&str> = rows.iter().map(|r| r.company.as_str()).collect();
    assert_eq!(companies, ["Acme", "Citadel", "Stryker"]);
    let stryker = rows.iter().find(|r| r.company == "Stryker").unwrap();
    assert_eq!(stryker.status, ApplicationStatus::Applied);
}

#[test]
fn test_overwrite_replaces_existing_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("apps.xlsx");
    let table = XlsxTable::new("Tracker");

    persist(
        &table,
        &[record("Stryker", "Software Intern", "2025-09-01")],
        &path,
        WriteMode::Overwrite,
    )
    .unwrap();
    persist(
        &table,
        &[record("Citadel", "Quant Intern", "2025-09-03")],
        &path,
        WriteMode::Overwrite,
    )
    .unwrap();

    let rows = table.read_table(&path).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company, "Citadel");
}

#[test]
fn test_append_creates_missing_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("new").join("apps.xlsx");

    let outcome = persist(
        &XlsxTable::default(),
        &[record("Stryker", "Software Intern", "2025-09-01")],
        &path,
        WriteMode::Append,
    )
    .unwrap();

    assert_eq!(outcome.rows_added, 1);
    assert!(path.exists());
}

#[test]
fn test_failed_append_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("apps.xlsx");
    std::fs::write(&path, b"this is not a workbook").unwrap();

    let result = persist(
        &XlsxTable::default(),
        &[record("Stryker", "Software Intern", "2025-09-01")],
        &path,
        WriteMode::Append,
    );

    assert!(matches!(result, Err(TableError::ReadFile { .. })));
    assert_eq!(std::fs::read(&path).unwrap(), b"this is not a workbook");
}

#[test]
fn test_store_error_propagates() {
    let result = persist(
        &FailingTable,
        &[record("Stryker", "Software Intern", "2025-09-01")],
        Path::new("/data/apps.xlsx"),
        WriteMode::Overwrite,
    );
    assert!(matches!(result, Err(TableError::Encode(_))));
}
