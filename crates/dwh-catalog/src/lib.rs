//! dwh-catalog - Query catalog for the song-play star schema
//!
//! This crate owns every SQL statement the loader sends to the warehouse.
//! Table definitions and their templates are declared once in [`tables`];
//! [`QueryCatalog`] renders them against the configuration and orders them
//! by the foreign-key graph into the lists the phase drivers execute.

pub mod catalog;
pub mod error;
pub mod statement;
pub mod tables;

pub use catalog::{Phase, QueryCatalog};
pub use error::{CatalogError, CatalogResult};
pub use statement::{Statement, StatementKind};
pub use tables::{TableDef, TableKind, Template, STAR_SCHEMA};
