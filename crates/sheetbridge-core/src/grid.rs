//! Tabular value types shared by the sheet and SQL helpers.

use serde_json::Value;

/// A single cell value.
pub type Cell = Value;

/// One row of cells.
pub type Row = Vec<Cell>;

/// Two-dimensional values, indexed by row, then by column.
pub type Grid = Vec<Row>;

/// Render a cell the way a sheet displays it when joined into text.
pub fn cell_text(cell: &Cell) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether a cell renders as empty text.
pub fn cell_is_blank(cell: &Cell) -> bool {
    match cell {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Whether every cell in a row renders as empty text.
pub fn row_is_blank(row: &[Cell]) -> bool {
    row.iter().all(cell_is_blank)
}
