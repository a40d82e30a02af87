//! Rendered statements

use std::fmt;

/// What a statement does, which also decides how it is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// `DROP TABLE IF EXISTS`
    Drop,
    /// `CREATE TABLE`
    Create,
    /// Bulk load from object storage
    Copy,
    /// `INSERT ... SELECT` transform
    Insert,
    /// Read-only query whose rows are fetched and reported
    Query,
}

impl StatementKind {
    /// Whether the statement produces a result set that should be fetched
    pub fn returns_rows(self) -> bool {
        matches!(self, StatementKind::Query)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Drop => write!(f, "drop"),
            StatementKind::Create => write!(f, "create"),
            StatementKind::Copy => write!(f, "copy"),
            StatementKind::Insert => write!(f, "insert"),
            StatementKind::Query => write!(f, "query"),
        }
    }
}

/// A ready-to-execute SQL statement
///
/// Built once when the catalog is constructed; the text never changes
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    table: String,
    kind: StatementKind,
    sql: String,
}

impl Statement {
    /// Create a statement targeting `table`
    pub fn new(table: impl Into<String>, kind: StatementKind, sql: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind,
            sql: sql.into().trim().to_string(),
        }
    }

    /// Table the statement targets
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Statement kind
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// SQL text
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
