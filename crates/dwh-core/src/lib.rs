//! dwh-core - Core library for the warehouse loader
//!
//! This crate provides the configuration model loaded from `dwh.yml`, the
//! core error type, the foreign-key dependency graph used to order DDL, and
//! SQL identifier utilities shared by the other crates.

pub mod config;
pub mod dag;
pub mod error;
pub mod sql_utils;

pub use config::{ClusterConfig, Config, IamRoleConfig, S3Config};
pub use dag::TableDag;
pub use error::{CoreError, CoreResult};
