//! CLI argument definitions using clap derive API

use clap::{Args, Parser};
use dwh_core::config::DEFAULT_CONFIG_FILE;
use dwh_etl::LoadOptions;
use std::path::PathBuf;

/// Options shared by both entry points
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to the warehouse configuration file
    #[arg(short, long, env = "DWH_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Send progress to the log instead of standard output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the statements that would run without connecting
    #[arg(long)]
    pub dry_run: bool,

    /// Override CLUSTER.DB_PASSWORD from the configuration file
    #[arg(long, env = "DWH_DB_PASSWORD", hide = true, hide_env_values = true)]
    pub db_password: Option<String>,
}

/// Drop and recreate every warehouse table
#[derive(Parser, Debug)]
#[command(name = "create-tables")]
#[command(author, version, about, long_about = None)]
pub struct CreateTablesCli {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Load staging tables from S3, then fill the star schema
#[derive(Parser, Debug)]
#[command(name = "etl")]
#[command(author, version, about, long_about = None)]
pub struct EtlCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Skip copying S3 data into the staging tables
    #[arg(short = 's', long)]
    pub skip_staging: bool,

    /// Skip inserting staging data into the final tables
    #[arg(short = 'f', long)]
    pub skip_final: bool,

    /// Print row counts for every table after loading
    #[arg(long)]
    pub report_counts: bool,
}

impl EtlCli {
    /// Load driver switches from the parsed flags
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            skip_staging: self.skip_staging,
            skip_final: self.skip_final,
            report_counts: self.report_counts,
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
