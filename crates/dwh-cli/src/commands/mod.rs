//! Entry point implementations

pub mod create_tables;
pub mod etl;
