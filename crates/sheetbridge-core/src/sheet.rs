//! Spreadsheet model: workbooks of named sheets holding cell values and
//! cosmetic formatting.

use crate::grid::{Cell, Grid, Row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A spreadsheet document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub id: String,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sheets: vec![],
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    /// Get the named sheet, inserting an empty one when it does not exist.
    pub fn sheet_or_insert(&mut self, name: &str) -> &mut Sheet {
        let idx = match self.sheets.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sheets.push(Sheet::new(name));
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[idx]
    }
}

/// One sheet (tab) of a workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    #[serde(default)]
    pub rows: Grid,
    #[serde(default)]
    pub format: SheetFormat,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: vec![],
            format: SheetFormat::default(),
        }
    }

    pub fn with_rows(mut self, rows: Grid) -> Self {
        self.rows = rows;
        self
    }

    /// Number of rows holding data.
    pub fn last_row(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length.
    pub fn last_column(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Every value, padded to a rectangle with empty strings.
    pub fn data_range(&self) -> Grid {
        let width = self.last_column();
        self.rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.resize(width, Cell::String(String::new()));
                row
            })
            .collect()
    }

    /// Erase values, keeping formatting.
    pub fn clear_contents(&mut self) {
        self.rows.clear();
    }

    /// Insert `count` empty rows after the 1-based row `after`.
    pub fn insert_rows_after(&mut self, after: usize, count: usize) {
        let at = after.min(self.rows.len());
        self.rows
            .splice(at..at, std::iter::repeat_n(Row::new(), count));
    }

    /// Write a block of values with its top-left corner at the 1-based
    /// `(row, column)`, growing the sheet as needed.
    pub fn set_values(&mut self, row: usize, column: usize, values: &[Row]) {
        let top = row.saturating_sub(1);
        let left = column.saturating_sub(1);
        if self.rows.len() < top + values.len() {
            self.rows.resize(top + values.len(), Row::new());
        }
        for (offset, source) in values.iter().enumerate() {
            let target = &mut self.rows[top + offset];
            if target.len() < left + source.len() {
                target.resize(left + source.len(), Cell::String(String::new()));
            }
            target[left..left + source.len()].clone_from_slice(source);
        }
    }

    /// Append a row after the last row holding data.
    pub fn append_row(&mut self, row: Row) {
        self.rows.push(row);
    }
}

/// Horizontal alignment of a range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment of a range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Middle,
    #[default]
    Bottom,
}

/// Text wrapping of a range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapStrategy {
    #[default]
    Overflow,
    Wrap,
    Clip,
}

/// Cosmetic formatting of a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetFormat {
    pub tab_color: Option<String>,
    pub frozen_rows: u32,
    pub font_family: String,
    pub font_size: u32,
    pub vertical_align: VerticalAlign,
    pub wrap: WrapStrategy,
    pub header_background: Option<String>,
    pub header_align: HorizontalAlign,
    pub header_bold: bool,
    /// Explicit row heights in pixels, keyed by 1-based row.
    pub row_heights: BTreeMap<usize, u32>,
}

impl Default for SheetFormat {
    fn default() -> Self {
        Self {
            tab_color: None,
            frozen_rows: 0,
            font_family: "Arial".to_string(),
            font_size: 10,
            vertical_align: VerticalAlign::default(),
            wrap: WrapStrategy::default(),
            header_background: None,
            header_align: HorizontalAlign::default(),
            header_bold: false,
            row_heights: BTreeMap::new(),
        }
    }
}
