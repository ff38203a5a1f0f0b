//! SQL side of SheetBridge: moving grids into tables and reading query
//! results back out.

pub mod identifier;
pub mod postgres;
pub mod transfer;

pub use identifier::{quote_identifier, validate_identifier};
pub use postgres::PgTableStore;
pub use transfer::{SqlWriteReport, prepare_insert, read_table, write_directives, write_to_sql};

use sheetbridge_core::{Error, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Database connection pool.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to the database.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Get the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Table store backed by this pool.
    pub fn tables(&self) -> PgTableStore {
        PgTableStore::new(self.pool.clone())
    }
}
