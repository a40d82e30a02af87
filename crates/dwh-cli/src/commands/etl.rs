//! Load staging tables and the star schema

use anyhow::{Context, Result};
use dwh_etl::{close_session, load, LoadOptions, LoadSummary, ReportSink};

use crate::cli::EtlCli;
use crate::context::RuntimeContext;

/// Execute the etl entry point
pub async fn execute(args: &EtlCli) -> Result<()> {
    let ctx = RuntimeContext::new(&args.common)?;
    let mut sink = ctx.report_sink();

    let summary = run(&ctx, args.load_options(), sink.as_mut()).await?;

    let line = summary_line(&summary);
    if ctx.quiet {
        log::info!("{}", line);
    } else {
        println!("\n{}", line);
    }
    Ok(())
}

/// Connect and run the enabled load phases, reporting progress to `sink`
pub async fn run(
    ctx: &RuntimeContext,
    options: LoadOptions,
    sink: &mut dyn ReportSink,
) -> Result<LoadSummary> {
    let db = ctx.connect().await?;
    close_session(db.as_ref(), load(db.as_ref(), &ctx.catalog, options, sink))
        .await
        .context("Load failed")
}

/// One-line outcome of a load
pub fn summary_line(summary: &LoadSummary) -> String {
    let phases = summary.phases_run();
    if phases.is_empty() {
        return "Nothing to load".to_string();
    }

    let names: Vec<String> = phases.iter().map(|p| p.to_string()).collect();
    let rows: u64 = [&summary.staging, &summary.final_insert]
        .into_iter()
        .flatten()
        .map(|s| s.rows_affected())
        .sum();
    format!("Completed {} ({} rows affected)", names.join(", "), rows)
}
