//! Spreadsheet helpers: reading and writing grids, cosmetic formatting,
//! deduplication, and runtime bookkeeping.

pub mod dedup;
pub mod duration;
pub mod file;
pub mod format;
pub mod memory;
pub mod runtime;
pub mod transfer;

pub use dedup::{DedupKey, deduplicate, deduplicate_rows};
pub use duration::convert_millis;
pub use file::FileSpreadsheets;
pub use format::{SheetPurpose, format_sheet};
pub use memory::MemorySpreadsheets;
pub use runtime::{RUNTIME_PROPERTY, RUNTIME_SHEET, record_runtime, runtime_count_stop};
pub use transfer::{SheetWriteReport, first_empty_row, read_select, write_to_sheets};
