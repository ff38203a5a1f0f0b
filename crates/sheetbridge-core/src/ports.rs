//! Port traits (hexagonal architecture).
//!
//! These traits define the interfaces between the helpers and the hosted
//! services they drive. The cache backend port lives with the cache itself
//! in `sheetbridge-cache`.

use crate::Result;
use crate::grid::Row;
use crate::sheet::Workbook;
use async_trait::async_trait;

/// Durable key-value property storage for one scope.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Get a property value.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a property value, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a single property.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Delete every property, returning how many were removed.
    async fn delete_all(&self) -> Result<usize>;

    /// List property keys.
    async fn keys(&self) -> Result<Vec<String>>;
}

/// Access to spreadsheets by ID.
#[async_trait]
pub trait SpreadsheetService: Send + Sync {
    /// Open a spreadsheet.
    async fn open(&self, id: &str) -> Result<Workbook>;

    /// Persist a spreadsheet previously returned by `open`.
    async fn save(&self, workbook: &Workbook) -> Result<()>;
}

/// Column metadata reported by a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub auto_increment: bool,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, auto_increment: bool) -> Self {
        Self {
            name: name.into(),
            auto_increment,
        }
    }
}

/// Rows returned by a query, with values rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// A relational database holding the tables data is written to.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Column metadata of a table, in table order.
    async fn columns(&self, table: &str) -> Result<Vec<ColumnMeta>>;

    /// Remove every row of a table.
    async fn truncate(&self, table: &str) -> Result<()>;

    /// Insert rows into the named columns as one batch. Null cells are
    /// written as SQL NULL.
    async fn insert_rows(&self, table: &str, columns: &[String], rows: &[Row]) -> Result<u64>;

    /// Run a query, returning at most `max_rows` rows. Column names are
    /// reported even when no row matches.
    async fn query(&self, sql: &str, max_rows: u32) -> Result<QueryResult>;
}
