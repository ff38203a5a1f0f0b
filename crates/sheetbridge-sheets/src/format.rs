//! Standard cosmetic formatting for working sheets.

use sheetbridge_core::sheet::{HorizontalAlign, VerticalAlign, WrapStrategy};
use sheetbridge_core::{Error, Sheet};
use std::str::FromStr;

/// What a sheet is used for; decides its tab colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SheetPurpose {
    #[default]
    Script,
    DataValidation,
    ImportRange,
    Manual,
    Utility,
    Work,
}

impl SheetPurpose {
    pub fn tab_color(&self) -> &'static str {
        match self {
            SheetPurpose::Script => "#ffd966",
            SheetPurpose::DataValidation => "#000000",
            SheetPurpose::ImportRange => "#8e7cc3",
            SheetPurpose::Manual => "#cc4125",
            SheetPurpose::Utility => "#f6b26b",
            SheetPurpose::Work => "#57bb8a",
        }
    }
}

impl FromStr for SheetPurpose {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "script" => Ok(SheetPurpose::Script),
            "dataval" => Ok(SheetPurpose::DataValidation),
            "importrange" => Ok(SheetPurpose::ImportRange),
            "manual" => Ok(SheetPurpose::Manual),
            "utility" => Ok(SheetPurpose::Utility),
            "work" => Ok(SheetPurpose::Work),
            _ => Err(Error::Config(format!("Unknown sheet purpose: {}", s))),
        }
    }
}

const ROW_HEIGHT: u32 = 30;
const HEADER_BACKGROUND: &str = "#d9d9d9";

/// Apply the standard styling. With `rows_limit`, only the last
/// `rows_limit` rows receive the fixed row height, which keeps very long
/// sheets fast to format.
pub fn format_sheet(sheet: &mut Sheet, purpose: SheetPurpose, rows_limit: Option<usize>) {
    let last_row = sheet.last_row();
    let format = &mut sheet.format;

    format.tab_color = Some(purpose.tab_color().to_string());
    format.frozen_rows = 1;
    format.vertical_align = VerticalAlign::Middle;
    format.font_family = "Roboto Mono".to_string();
    format.wrap = WrapStrategy::Clip;
    format.font_size = 10;

    format.header_background = Some(HEADER_BACKGROUND.to_string());
    format.header_align = HorizontalAlign::Center;
    format.header_bold = true;

    let first = match rows_limit {
        Some(limit) => last_row.saturating_sub(limit) + 1,
        None => 1,
    };
    for row in first..=last_row {
        format.row_heights.insert(row, ROW_HEIGHT);
    }
}
