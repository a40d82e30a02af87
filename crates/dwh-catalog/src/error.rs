//! Error types for dwh-catalog

use thiserror::Error;

/// Query catalog construction errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A statement template failed to render (C001)
    #[error("[C001] Failed to render statement for table '{table}': {source}")]
    Render {
        table: String,
        source: dwh_jinja::JinjaError,
    },

    /// The declared table references do not form a valid graph (C002)
    #[error("[C002] Invalid table graph: {0}")]
    Graph(#[from] dwh_core::CoreError),

    /// A table in the dependency order has no definition (C003)
    #[error("[C003] No definition for table '{table}'")]
    MissingDefinition { table: String },
}

/// Result type alias for CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;
