//! Write directives: one instruction to move a grid into a sheet and,
//! optionally, a SQL table.

use crate::grid::{Grid, Row};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteDirective {
    /// Name of the calling routine, used to label timing logs.
    pub function_name: String,
    /// Append below existing data instead of replacing it.
    #[serde(default)]
    pub append: bool,
    /// Values to write. The first row is the header row.
    pub data: Grid,
    /// Destination spreadsheet ID.
    pub sheet_id: String,
    /// Destination sheet name within the spreadsheet.
    pub sheet_name: String,
    /// Also write the data to `sql_table` after the sheet write.
    #[serde(default)]
    pub sql_write: bool,
    /// Destination SQL table.
    #[serde(default)]
    pub sql_table: Option<String>,
    /// Explicit insert columns. When absent, every non auto-increment
    /// column of the table is used.
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

impl WriteDirective {
    pub fn new(
        function_name: impl Into<String>,
        sheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
        data: Grid,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            append: false,
            data,
            sheet_id: sheet_id.into(),
            sheet_name: sheet_name.into(),
            sql_write: false,
            sql_table: None,
            columns: None,
        }
    }

    pub fn appending(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn with_sql_table(mut self, table: impl Into<String>) -> Self {
        self.sql_write = true;
        self.sql_table = Some(table.into());
        self
    }

    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Rows written when appending: the header is dropped unless it is the
    /// only row.
    pub fn appended_rows(&self) -> &[Row] {
        if self.data.len() > 1 {
            &self.data[1..]
        } else {
            &self.data
        }
    }

    /// Rows that go to SQL. Appends follow the sheet append rule; full
    /// rewrites always drop the header.
    pub fn sql_rows(&self) -> &[Row] {
        if self.append {
            self.appended_rows()
        } else {
            self.data.get(1..).unwrap_or(&[])
        }
    }

    /// Width of the written range, taken from the first row.
    pub fn width(&self) -> usize {
        self.data.first().map(Vec::len).unwrap_or(0)
    }

    pub fn validate(&self) -> Result<()> {
        if self.data.is_empty() || self.width() == 0 {
            return Err(Error::InvalidDirective(format!(
                "{}: no data to write to {}",
                self.function_name, self.sheet_name
            )));
        }
        if self.sql_write && self.sql_table.is_none() {
            return Err(Error::InvalidDirective(format!(
                "{}: sql_write requested without sql_table",
                self.function_name
            )));
        }
        Ok(())
    }

    pub fn table(&self) -> Result<&str> {
        self.sql_table.as_deref().ok_or_else(|| {
            Error::InvalidDirective(format!("{}: missing sql_table", self.function_name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn grid() -> Grid {
        vec![
            vec![json!("id"), json!("name")],
            vec![json!(1), json!("a")],
            vec![json!(2), json!("b")],
        ]
    }

    #[test]
    fn test_appended_rows_drop_header() {
        let d = WriteDirective::new("sync", "sheet", "Data", grid()).appending(true);
        assert_eq!(d.appended_rows().len(), 2);
        assert_eq!(d.appended_rows()[0][0], json!(1));
    }

    #[test]
    fn test_single_row_append_keeps_row() {
        let d = WriteDirective::new("sync", "sheet", "Data", vec![vec![json!(7)]]).appending(true);
        assert_eq!(d.appended_rows().len(), 1);
    }

    #[test]
    fn test_sql_rows_on_rewrite_drop_header() {
        let d = WriteDirective::new("sync", "sheet", "Data", grid()).with_sql_table("items");
        assert_eq!(d.sql_rows().len(), 2);

        let header_only =
            WriteDirective::new("sync", "sheet", "Data", vec![vec![json!("id")]]).with_sql_table("t");
        assert!(header_only.sql_rows().is_empty());
    }

    #[test]
    fn test_validate() {
        let empty = WriteDirective::new("sync", "sheet", "Data", vec![]);
        assert!(matches!(empty.validate(), Err(Error::InvalidDirective(_))));

        let mut no_table = WriteDirective::new("sync", "sheet", "Data", grid());
        no_table.sql_write = true;
        assert!(no_table.validate().is_err());

        assert!(WriteDirective::new("sync", "sheet", "Data", grid()).validate().is_ok());
    }

    #[test]
    fn test_deserialize_defaults() {
        let d: WriteDirective = serde_json::from_value(json!({
            "function_name": "nightly",
            "data": [["a"], [1]],
            "sheet_id": "abc",
            "sheet_name": "Data"
        }))
        .unwrap();
        assert!(!d.append);
        assert!(!d.sql_write);
        assert_eq!(d.columns, None);
    }
}
