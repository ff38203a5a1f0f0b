//! PostgreSQL implementation of TableStore.

use crate::identifier::{quote_identifier, validate_identifier};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sheetbridge_core::ports::{ColumnMeta, QueryResult, TableStore};
use sheetbridge_core::{Error, Result, Row};
use sqlx::types::Json;
use sqlx::{Column, Executor, PgPool, Row as _, Statement};
use tracing::debug;

/// PostgreSQL implementation of TableStore.
pub struct PgTableStore {
    pool: PgPool,
}

impl PgTableStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `INSERT` statement reading typed records out of a JSON array bound
    /// as `$1`, so each value is cast to its column's type by the server.
    fn insert_sql(table: &str, columns: &[String]) -> Result<String> {
        let table = quote_identifier(table)?;
        let columns = columns
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Result<Vec<_>>>()?
            .join(", ");
        Ok(format!(
            "INSERT INTO {table} ({columns}) SELECT {columns} FROM json_populate_recordset(NULL::{table}, $1)"
        ))
    }

    fn normalize(query: &str) -> &str {
        query.trim().trim_end_matches(';').trim_end()
    }

    /// Wrap a query so every row comes back as its values rendered as text,
    /// in column order.
    fn select_sql(query: &str, max_rows: u32) -> String {
        let query = Self::normalize(query);
        format!(
            "SELECT \
               (SELECT array_agg(e.value ORDER BY e.ord) FROM json_each_text(r.j) WITH ORDINALITY AS e(key, value, ord)) AS vals \
             FROM (SELECT row_to_json(q) AS j FROM ({query}) AS q LIMIT {max_rows}) AS r"
        )
    }

    fn records(columns: &[String], rows: &[Row]) -> Value {
        Value::Array(
            rows.iter()
                .map(|row| {
                    let record: Map<String, Value> = columns
                        .iter()
                        .enumerate()
                        .map(|(i, c)| (c.clone(), row.get(i).cloned().unwrap_or(Value::Null)))
                        .collect();
                    Value::Object(record)
                })
                .collect(),
        )
    }
}

#[async_trait]
impl TableStore for PgTableStore {
    async fn columns(&self, table: &str) -> Result<Vec<ColumnMeta>> {
        validate_identifier(table)?;
        let (schema, name) = match table.split_once('.') {
            Some((schema, name)) => (Some(schema), name),
            None => (None, table),
        };

        let rows = sqlx::query(
            r#"SELECT column_name::text AS column_name,
                      (coalesce(column_default, '') LIKE 'nextval(%' OR is_identity = 'YES') AS auto_increment
               FROM information_schema.columns
               WHERE table_name = $1 AND table_schema = coalesce($2, current_schema())
               ORDER BY ordinal_position"#,
        )
        .bind(name)
        .bind(schema)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        if rows.is_empty() {
            return Err(Error::Database(format!("Table not found: {}", table)));
        }
        Ok(rows
            .iter()
            .map(|r| ColumnMeta::new(r.get::<String, _>("column_name"), r.get("auto_increment")))
            .collect())
    }

    async fn truncate(&self, table: &str) -> Result<()> {
        let sql = format!("TRUNCATE TABLE {}", quote_identifier(table)?);
        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    async fn insert_rows(&self, table: &str, columns: &[String], rows: &[Row]) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }
        let sql = Self::insert_sql(table, columns)?;
        debug!(table = %table, rows = rows.len(), "Inserting rows");

        let result = sqlx::query(&sql)
            .bind(Json(Self::records(columns, rows)))
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(result.rows_affected())
    }

    async fn query(&self, sql: &str, max_rows: u32) -> Result<QueryResult> {
        // Column names come from the statement description so they are
        // known even when no row matches.
        let statement = self
            .pool
            .prepare(Self::normalize(sql))
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        let columns = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let rows = sqlx::query(&Self::select_sql(sql, max_rows))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(QueryResult {
            columns,
            rows: rows
                .iter()
                .map(|r| r.get::<Option<Vec<Option<String>>>, _>("vals").unwrap_or_default())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_sql() {
        let sql = PgTableStore::insert_sql("public.orders", &["id".into(), "name".into()]).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"public\".\"orders\" (\"id\", \"name\") SELECT \"id\", \"name\" \
             FROM json_populate_recordset(NULL::\"public\".\"orders\", $1)"
        );
    }

    #[test]
    fn test_insert_sql_rejects_bad_column() {
        let err = PgTableStore::insert_sql("orders", &["id; drop".into()]).unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
    }

    #[test]
    fn test_select_sql_strips_semicolon() {
        let sql = PgTableStore::select_sql("SELECT * FROM orders;  ", 10);
        assert!(sql.contains("FROM (SELECT * FROM orders) AS q LIMIT 10"));
        assert_eq!(PgTableStore::normalize(" SELECT 1 ; "), "SELECT 1");
    }

    #[test]
    fn test_records_pad_short_rows() {
        let records = PgTableStore::records(
            &["a".into(), "b".into()],
            &[vec![json!(1)], vec![json!(2), json!("x")]],
        );
        assert_eq!(records, json!([{"a": 1, "b": null}, {"a": 2, "b": "x"}]));
    }
}
