//! Drop and recreate the warehouse schema

use anyhow::{Context, Result};
use dwh_etl::{close_session, setup_schema, ReportSink, SetupSummary};

use crate::cli::CreateTablesCli;
use crate::context::RuntimeContext;

/// Execute the create-tables entry point
pub async fn execute(args: &CreateTablesCli) -> Result<()> {
    let ctx = RuntimeContext::new(&args.common)?;
    let mut sink = ctx.report_sink();

    let summary = run(&ctx, sink.as_mut()).await?;

    let line = format!(
        "Dropped {} and created {} tables in {:.2}s",
        summary.drop.statements(),
        summary.create.statements(),
        (summary.drop.duration + summary.create.duration).as_secs_f64()
    );
    if ctx.quiet {
        log::info!("{}", line);
    } else {
        println!("\n{}", line);
    }
    Ok(())
}

/// Connect and rebuild the schema, reporting progress to `sink`
pub async fn run(ctx: &RuntimeContext, sink: &mut dyn ReportSink) -> Result<SetupSummary> {
    let db = ctx.connect().await?;
    close_session(db.as_ref(), setup_schema(db.as_ref(), &ctx.catalog, sink))
        .await
        .context("Schema setup failed")
}
