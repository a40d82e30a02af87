//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Rows returned by a query, every value rendered as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRows {
    /// Column names in result order
    pub columns: Vec<String>,
    /// Row values; SQL NULL is rendered as `NULL`
    pub rows: Vec<Vec<String>>,
}

impl QueryRows {
    /// Whether the query produced no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// One warehouse session
///
/// Every call runs in its own transaction and is committed before it
/// returns; there is no multi-statement grouping.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a statement that produces no result set, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<u64>;

    /// Execute a statement and fetch every row it returns
    async fn query_rows(&self, sql: &str) -> DbResult<QueryRows>;

    /// Close the session; closing twice is a no-op
    async fn close(&self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
