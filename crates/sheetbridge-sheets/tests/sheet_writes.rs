//! Applying write directives and runtime bookkeeping against the
//! in-memory spreadsheet service.

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use sheetbridge_core::ports::PropertyStore;
use sheetbridge_core::{Error, Grid, Sheet, Workbook, WriteDirective};
use sheetbridge_props::MemoryPropertyStore;
use sheetbridge_sheets::{
    MemorySpreadsheets, RUNTIME_PROPERTY, RUNTIME_SHEET, read_select, record_runtime,
    runtime_count_stop, write_to_sheets,
};

fn grid(rows: &[&[Value]]) -> Grid {
    rows.iter().map(|r| r.to_vec()).collect()
}

async fn service_with(sheet: Sheet) -> MemorySpreadsheets {
    let service = MemorySpreadsheets::new();
    let mut workbook = Workbook::new("book");
    workbook.sheets.push(sheet);
    service.insert(workbook).await;
    service
}

#[tokio::test]
async fn test_append_drops_header_and_fills_first_gap() {
    let existing = grid(&[
        &[json!("id"), json!("name")],
        &[json!(1), json!("a")],
        &[json!(""), json!("")],
        &[json!(9), json!("footer")],
    ]);
    let service = service_with(Sheet::new("Orders").with_rows(existing)).await;

    let data = grid(&[
        &[json!("id"), json!("name")],
        &[json!(2), json!("b")],
        &[json!(3), json!("c")],
    ]);
    let directive = WriteDirective::new("sync", "book", "Orders", data).appending(true);
    let reports = write_to_sheets(&service, &[directive]).await.unwrap();

    assert_eq!(reports[0].start_row, 3);
    assert_eq!(reports[0].rows_written, 2);
    assert!(!reports[0].created);

    let rows = read_select(&service, "book", "Orders").await.unwrap();
    assert_eq!(
        rows,
        grid(&[
            &[json!("id"), json!("name")],
            &[json!(1), json!("a")],
            &[json!(2), json!("b")],
            &[json!(3), json!("c")],
            &[json!(""), json!("")],
            &[json!(9), json!("footer")],
        ])
    );
}

#[tokio::test]
async fn test_overwrite_clears_previous_values() {
    let existing = grid(&[&[json!("old"), json!("header"), json!("wide")], &[json!(1)]]);
    let service = service_with(Sheet::new("Orders").with_rows(existing)).await;

    let data = grid(&[&[json!("id")], &[json!(5)]]);
    let directive = WriteDirective::new("sync", "book", "Orders", data.clone());
    write_to_sheets(&service, &[directive]).await.unwrap();

    assert_eq!(read_select(&service, "book", "Orders").await.unwrap(), data);
}

#[tokio::test]
async fn test_missing_sheet_is_created() {
    let service = service_with(Sheet::new("Other")).await;
    let data = grid(&[&[json!("h")], &[json!(1)]]);

    let reports = write_to_sheets(&service, &[WriteDirective::new("f", "book", "New", data.clone())])
        .await
        .unwrap();
    assert!(reports[0].created);

    let workbook = service.workbook("book").await.unwrap();
    assert_eq!(workbook.sheets.len(), 2);
    assert_eq!(workbook.sheet("New").unwrap().rows, data);
}

#[tokio::test]
async fn test_multiple_directives_applied_in_order() {
    let service = service_with(Sheet::new("A")).await;
    let directives = vec![
        WriteDirective::new("f", "book", "A", grid(&[&[json!("x")]])),
        WriteDirective::new("f", "book", "B", grid(&[&[json!("y")]])),
    ];

    let reports = write_to_sheets(&service, &directives).await.unwrap();
    let names: Vec<&str> = reports.iter().map(|r| r.sheet_name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn test_read_select_unknown_sheet() {
    let service = service_with(Sheet::new("A")).await;
    let err = read_select(&service, "book", "Missing").await.unwrap_err();
    assert!(matches!(err, Error::SheetNotFound(_)));
}

#[tokio::test]
async fn test_runtime_accumulates_and_records() {
    let service = service_with(Sheet::new("Data")).await;
    let props = MemoryPropertyStore::new();
    props.set(RUNTIME_PROPERTY, "1000").await.unwrap();

    let total = runtime_count_stop(&props, Utc::now() - Duration::seconds(2))
        .await
        .unwrap();
    assert!(total >= 3000);

    let recorded = record_runtime(&service, "book", &props).await.unwrap();
    assert_eq!(recorded, Some(total));
    assert_eq!(props.get(RUNTIME_PROPERTY).await.unwrap(), None);

    let rows = read_select(&service, "book", RUNTIME_SHEET).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], json!(total));
}

#[tokio::test]
async fn test_runtime_without_count_records_blank() {
    let service = service_with(Sheet::new("Data")).await;
    let props = MemoryPropertyStore::new();

    assert_eq!(record_runtime(&service, "book", &props).await.unwrap(), None);
    let rows = read_select(&service, "book", RUNTIME_SHEET).await.unwrap();
    assert_eq!(rows[0][1], Value::Null);
}
