//! create-tables - drop and recreate every warehouse table

use anyhow::Result;
use clap::Parser;
use dwh_cli::cli::CreateTablesCli;
use dwh_cli::commands::create_tables;
use dwh_cli::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = CreateTablesCli::parse();
    logging::init(cli.common.verbose);

    create_tables::execute(&cli).await
}
