//! Reading grids from sheets and applying write directives.

use sheetbridge_core::grid::row_is_blank;
use sheetbridge_core::ports::SpreadsheetService;
use sheetbridge_core::{Error, Grid, Result, Sheet, WriteDirective};
use std::time::Instant;
use tracing::{debug, info};

/// Where one directive landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetWriteReport {
    pub sheet_id: String,
    pub sheet_name: String,
    /// 1-based row the block was written at.
    pub start_row: usize,
    pub rows_written: usize,
    /// The sheet did not exist and was inserted.
    pub created: bool,
}

/// 1-based index of the first row whose cells are all empty, or the row
/// after the last one.
pub fn first_empty_row(sheet: &Sheet) -> usize {
    sheet
        .rows
        .iter()
        .position(|row| row_is_blank(row))
        .unwrap_or(sheet.rows.len())
        + 1
}

/// Every value of the named sheet, indexed by row, then by column.
pub async fn read_select(
    service: &dyn SpreadsheetService,
    sheet_id: &str,
    sheet_name: &str,
) -> Result<Grid> {
    let workbook = service.open(sheet_id).await?;
    let sheet = workbook
        .sheet(sheet_name)
        .ok_or_else(|| Error::SheetNotFound(format!("{} in {}", sheet_name, sheet_id)))?;
    Ok(sheet.data_range())
}

/// Write each directive's data to its sheet, inserting the sheet when
/// missing. Appends go below the first empty row without the header;
/// otherwise the sheet is cleared and rewritten from the top.
pub async fn write_to_sheets(
    service: &dyn SpreadsheetService,
    directives: &[WriteDirective],
) -> Result<Vec<SheetWriteReport>> {
    let Some(first) = directives.first() else {
        return Ok(vec![]);
    };
    let start = Instant::now();
    let mut reports = Vec::with_capacity(directives.len());

    for directive in directives {
        directive.validate()?;

        let mut workbook = service.open(&directive.sheet_id).await?;
        let created = workbook.sheet(&directive.sheet_name).is_none();
        let sheet = workbook.sheet_or_insert(&directive.sheet_name);

        let (start_row, rows) = if directive.append {
            let row = first_empty_row(sheet);
            let rows = directive.appended_rows();
            sheet.insert_rows_after(row - 1, rows.len());
            (row, rows)
        } else {
            sheet.clear_contents();
            (1, directive.data.as_slice())
        };
        sheet.set_values(start_row, 1, rows);

        service.save(&workbook).await?;
        debug!(
            sheet = %directive.sheet_name,
            start_row,
            rows = rows.len(),
            created,
            "Wrote directive"
        );
        reports.push(SheetWriteReport {
            sheet_id: directive.sheet_id.clone(),
            sheet_name: directive.sheet_name.clone(),
            start_row,
            rows_written: rows.len(),
            created,
        });
    }

    info!(
        function = %first.function_name,
        directives = directives.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Write to sheets"
    );
    Ok(reports)
}
