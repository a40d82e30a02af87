//! Backend that records statements instead of sending them anywhere

use crate::error::{DbError, DbResult};
use crate::traits::{Database, QueryRows};
use async_trait::async_trait;
use std::sync::Mutex;

/// Accepts every statement without a warehouse behind it.
///
/// Used for `--dry-run`: the phase drivers run unchanged and the report sink
/// shows exactly what a real run would send.
#[derive(Debug, Default)]
pub struct DryRunBackend {
    executed: Mutex<Vec<String>>,
}

impl DryRunBackend {
    /// Create an empty dry-run session
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements received so far, in order
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn record(&self, sql: &str) -> DbResult<()> {
        self.executed
            .lock()
            .map_err(|e| DbError::ExecutionError(format!("statement log poisoned: {}", e)))?
            .push(sql.to_string());
        Ok(())
    }
}

#[async_trait]
impl Database for DryRunBackend {
    async fn execute(&self, sql: &str) -> DbResult<u64> {
        self.record(sql)?;
        Ok(0)
    }

    async fn query_rows(&self, sql: &str) -> DbResult<QueryRows> {
        self.record(sql)?;
        Ok(QueryRows::default())
    }

    async fn close(&self) -> DbResult<()> {
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "dry-run"
    }
}

#[cfg(test)]
#[path = "dry_run_test.rs"]
mod tests;
