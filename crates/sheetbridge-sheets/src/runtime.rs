//! Accumulated execution time, kept in a script property and recorded
//! daily into a sheet.

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use sheetbridge_core::ports::{PropertyStore, SpreadsheetService};
use sheetbridge_core::{Error, Result};
use tracing::info;

/// Script property holding accumulated milliseconds.
pub const RUNTIME_PROPERTY: &str = "runtimeCount";

/// Sheet receiving one row per recording.
pub const RUNTIME_SHEET: &str = "Runtime";

async fn current_count(props: &dyn PropertyStore) -> Result<Option<i64>> {
    match props.get(RUNTIME_PROPERTY).await? {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            Error::Storage(format!("Invalid {} value: {}", RUNTIME_PROPERTY, raw))
        }),
        None => Ok(None),
    }
}

/// Add the time elapsed since `start` to the accumulated runtime and
/// return the new total in milliseconds.
pub async fn runtime_count_stop(props: &dyn PropertyStore, start: DateTime<Utc>) -> Result<i64> {
    let elapsed = (Utc::now() - start).num_milliseconds().max(0);
    let total = current_count(props).await?.unwrap_or(0) + elapsed;
    props.set(RUNTIME_PROPERTY, &total.to_string()).await?;
    Ok(total)
}

/// Append `[now, accumulated runtime]` to the runtime sheet of the given
/// spreadsheet, creating the sheet when needed, then reset the counter.
pub async fn record_runtime(
    service: &dyn SpreadsheetService,
    spreadsheet_id: &str,
    props: &dyn PropertyStore,
) -> Result<Option<i64>> {
    let count = current_count(props).await?;

    let mut workbook = service.open(spreadsheet_id).await?;
    workbook.sheet_or_insert(RUNTIME_SHEET).append_row(vec![
        json!(Utc::now().to_rfc3339()),
        count.map(Value::from).unwrap_or(Value::Null),
    ]);
    service.save(&workbook).await?;

    props.delete(RUNTIME_PROPERTY).await?;
    info!(spreadsheet = %spreadsheet_id, runtime_ms = ?count, "Recorded runtime");
    Ok(count)
}
