//! DuckDB database backend implementation
//!
//! DuckDB runs in autocommit mode, so each call is committed on return just
//! like the Redshift backend's explicit per-statement transactions.

use crate::error::{DbError, DbResult};
use crate::traits::{Database, QueryRows};
use async_trait::async_trait;
use duckdb::Connection;
use std::sync::Mutex;

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Option<Connection>>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }

    /// Run `f` against the open connection
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> DbResult<T>) -> DbResult<T> {
        let guard = self
            .conn
            .lock()
            .map_err(|e| DbError::ExecutionError(format!("connection mutex poisoned: {}", e)))?;
        let conn = guard.as_ref().ok_or(DbError::SessionClosed)?;
        f(conn)
    }

    /// Execute several statements separated by semicolons
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.with_conn(|conn| {
            conn.execute_batch(sql)
                .map_err(|e| DbError::ExecutionError(e.to_string()))
        })
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<u64> {
        self.with_conn(|conn| {
            conn.execute(sql, [])
                .map(|n| n as u64)
                .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
        })
    }

    /// Query rows synchronously.
    ///
    /// DuckDB panics on `stmt.column_count()` before execution, so rows are
    /// collected via `query_map` first and column metadata read afterwards.
    fn query_rows_sync(&self, sql: &str) -> DbResult<QueryRows> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(sql)
                .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;

            let rows: Vec<Vec<String>> = stmt
                .query_map([], |row| {
                    let col_count = row.as_ref().column_count();
                    Ok((0..col_count)
                        .map(|i| column_as_string(row, i))
                        .collect())
                })
                .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| DbError::FetchError(e.to_string()))?;

            let columns = (0..stmt.column_count())
                .map(|i| stmt.column_name(i).map_or("?".to_string(), |v| v.to_string()))
                .collect();

            Ok(QueryRows { columns, rows })
        })
    }
}

/// Read a column value as a String, trying multiple DuckDB types.
///
/// DuckDB integer columns do not convert to `String`, so we try
/// String -> i64 -> f64 -> bool before falling back to the value's debug form.
fn column_as_string(row: &duckdb::Row<'_>, idx: usize) -> String {
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return s;
    }
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return n.to_string();
    }
    if let Ok(Some(f)) = row.get::<_, Option<f64>>(idx) {
        return f.to_string();
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return b.to_string();
    }
    match row.get::<_, duckdb::types::Value>(idx) {
        Ok(duckdb::types::Value::Null) | Err(_) => "NULL".to_string(),
        Ok(other) => format!("{:?}", other),
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<u64> {
        self.execute_sync(sql)
    }

    async fn query_rows(&self, sql: &str) -> DbResult<QueryRows> {
        self.query_rows_sync(sql)
    }

    async fn close(&self) -> DbResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DbError::ExecutionError(format!("connection mutex poisoned: {}", e)))?
            .take();
        match conn {
            Some(conn) => conn
                .close()
                .map_err(|(_, e)| DbError::ConnectionError(format!("close failed: {}", e))),
            None => Ok(()),
        }
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
