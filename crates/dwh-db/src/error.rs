//! Error types for dwh-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Session could not be established (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// The engine rejected a statement (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Rows could not be retrieved after the statement ran (D003)
    #[error("[D003] Failed to fetch results: {0}")]
    FetchError(String),

    /// The session was already closed (D004)
    #[error("[D004] Database session is closed")]
    SessionClosed,
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Whether the error means the session itself is unusable
    pub fn is_connection_error(&self) -> bool {
        matches!(self, DbError::ConnectionError(_) | DbError::SessionClosed)
    }
}
