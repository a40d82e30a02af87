//! dwh-db - Database abstraction layer for the warehouse loader
//!
//! This crate provides the `Database` trait the statement runner talks to,
//! the Redshift backend (Postgres wire protocol via sqlx), a dry-run backend
//! that only records statements, and, behind the `duckdb` feature, an
//! embedded DuckDB backend for local verification.

pub mod dry_run;
#[cfg(feature = "duckdb")]
pub mod duckdb;
pub mod error;
pub mod redshift;
pub mod traits;

#[cfg(feature = "duckdb")]
pub use self::duckdb::DuckDbBackend;
pub use dry_run::DryRunBackend;
pub use error::{DbError, DbResult};
pub use redshift::RedshiftBackend;
pub use traits::{Database, QueryRows};
