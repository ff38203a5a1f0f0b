//! Remove duplicate rows by a unique column or property.

use serde_json::Value;
use sheetbridge_core::Row;
use sheetbridge_core::grid::cell_text;
use std::collections::HashSet;

/// Where the unique value of an item lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupKey {
    /// Index into an array item.
    Column(usize),
    /// Property of an object item.
    Property(String),
}

impl DedupKey {
    fn extract<'a>(&self, item: &'a Value) -> Option<&'a Value> {
        match self {
            DedupKey::Column(idx) => item.as_array().and_then(|row| row.get(*idx)),
            DedupKey::Property(name) => item.as_object().and_then(|obj| obj.get(name)),
        }
    }
}

fn first_by<T: Clone>(items: &[T], key_of: impl Fn(&T) -> String) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|&item| seen.insert(key_of(item)))
        .cloned()
        .collect()
}

/// Keep the first item for each unique key, in first-seen order. Keys are
/// compared by their text rendering; items without the key share one
/// empty key.
pub fn deduplicate(items: &[Value], key: &DedupKey) -> Vec<Value> {
    first_by(items, |item| key.extract(item).map(cell_text).unwrap_or_default())
}

/// Keep the first row for each value of `column`.
pub fn deduplicate_rows(rows: &[Row], column: usize) -> Vec<Row> {
    first_by(rows, |row| row.get(column).map(cell_text).unwrap_or_default())
}
