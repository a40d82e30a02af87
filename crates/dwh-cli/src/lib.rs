//! dwh-cli - Entry points for the warehouse loader
//!
//! Two binaries share this library: `create-tables` resets the schema and
//! `etl` loads it.

pub mod cli;
pub mod commands;
pub mod context;
pub mod logging;
