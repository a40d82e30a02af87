//! etl - copy raw data into staging, then fill the star schema

use anyhow::Result;
use clap::Parser;
use dwh_cli::cli::EtlCli;
use dwh_cli::commands::etl;
use dwh_cli::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = EtlCli::parse();
    logging::init(cli.common.verbose);

    etl::execute(&cli).await
}
