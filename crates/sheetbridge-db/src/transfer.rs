//! Writing directive grids into SQL tables and reading query results.

use serde_json::Value;
use sheetbridge_core::ports::{SpreadsheetService, TableStore};
use sheetbridge_core::{Result, Row, WriteDirective};
use sheetbridge_sheets::{SheetWriteReport, write_to_sheets};
use std::time::Instant;
use tracing::{debug, info};

/// Rows inserted into one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlWriteReport {
    pub table: String,
    pub truncated: bool,
    pub rows_inserted: u64,
}

/// Columns an insert into `table` targets: the explicit list when given,
/// otherwise every column that is not auto-incremented.
pub async fn prepare_insert(
    store: &dyn TableStore,
    table: &str,
    columns: Option<&[String]>,
) -> Result<Vec<String>> {
    if let Some(columns) = columns {
        return Ok(columns.to_vec());
    }
    Ok(store
        .columns(table)
        .await?
        .into_iter()
        .filter(|c| !c.auto_increment)
        .map(|c| c.name)
        .collect())
}

fn null_blanks(rows: &[Row]) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Value::String(s) if s.is_empty() => Value::Null,
                    other => other.clone(),
                })
                .collect()
        })
        .collect()
}

/// Insert the data of every directive that asks for a SQL write. Tables
/// are truncated first unless the directive appends.
pub async fn write_to_sql(
    store: &dyn TableStore,
    directives: &[WriteDirective],
) -> Result<Vec<SqlWriteReport>> {
    let mut reports = vec![];

    for directive in directives.iter().filter(|d| d.sql_write) {
        directive.validate()?;
        let table = directive.table()?;
        let start = Instant::now();

        let columns = prepare_insert(store, table, directive.columns.as_deref()).await?;
        if !directive.append {
            store.truncate(table).await?;
            debug!(table = %table, "Truncated table");
        }

        let rows = null_blanks(directive.sql_rows());
        let inserted = store.insert_rows(table, &columns, &rows).await?;

        info!(
            function = %directive.function_name,
            table = %table,
            rows = inserted,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Write to SQL"
        );
        reports.push(SqlWriteReport {
            table: table.to_string(),
            truncated: !directive.append,
            rows_inserted: inserted,
        });
    }

    Ok(reports)
}

/// Write directives to their sheets, then to SQL when the first directive
/// requests it.
pub async fn write_directives(
    sheets: &dyn SpreadsheetService,
    store: &dyn TableStore,
    directives: &[WriteDirective],
) -> Result<(Vec<SheetWriteReport>, Vec<SqlWriteReport>)> {
    let sheet_reports = write_to_sheets(sheets, directives).await?;
    let sql_reports = match directives.first() {
        Some(first) if first.sql_write => write_to_sql(store, directives).await?,
        _ => vec![],
    };
    Ok((sheet_reports, sql_reports))
}

/// Run a query and return its rows as text, optionally preceded by a row
/// of column names.
pub async fn read_table(
    store: &dyn TableStore,
    query: &str,
    max_rows: u32,
    header_row: bool,
) -> Result<Vec<Vec<Option<String>>>> {
    let start = Instant::now();
    let result = store.query(query, max_rows).await?;

    let mut rows = Vec::with_capacity(result.rows.len() + 1);
    if header_row {
        rows.push(result.columns.into_iter().map(Some).collect());
    }
    rows.extend(result.rows);

    info!(
        rows = rows.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Read from SQL"
    );
    Ok(rows)
}
