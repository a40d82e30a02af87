//! Error types for dwh-etl

use dwh_catalog::Phase;
use dwh_db::DbError;
use thiserror::Error;

/// ETL run errors
#[derive(Error, Debug)]
pub enum EtlError {
    /// A statement failed; the phase stopped at this position (X001)
    #[error("[X001] {phase} statement {position}/{total} on '{table}' failed: {source}")]
    StatementFailed {
        phase: Phase,
        position: usize,
        total: usize,
        table: String,
        sql: String,
        source: DbError,
    },

    /// Session-level database error outside a statement (X002)
    #[error("[X002] {0}")]
    Db(#[from] DbError),
}

/// Result type alias for EtlError
pub type EtlResult<T> = Result<T, EtlError>;

impl EtlError {
    /// The statement text that failed, if the error came from a statement
    pub fn failed_sql(&self) -> Option<&str> {
        match self {
            EtlError::StatementFailed { sql, .. } => Some(sql),
            EtlError::Db(_) => None,
        }
    }
}
