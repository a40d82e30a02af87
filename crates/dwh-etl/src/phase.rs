//! Phase drivers
//!
//! Each driver walks the catalog's lists in a fixed order through one
//! [`StatementRunner`]. Neither driver closes the session; wrap the call in
//! [`close_session`] so the session is released on every exit path.

use crate::error::EtlResult;
use crate::report::ReportSink;
use crate::runner::{PhaseSummary, StatementRunner};
use dwh_catalog::{Phase, QueryCatalog};
use dwh_db::Database;
use std::future::Future;

/// Announced when the staging load is skipped
pub const SKIP_STAGING_MESSAGE: &str = "Not loading s3 bucket data into staging tables.";

/// Announced when the final inserts are skipped
pub const SKIP_FINAL_MESSAGE: &str = "Not loading staging table data into final tables.";

/// Result of a schema setup run
#[derive(Debug, Clone)]
pub struct SetupSummary {
    /// Drop phase
    pub drop: PhaseSummary,
    /// Create phase
    pub create: PhaseSummary,
}

/// Load driver switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Do not COPY from object storage into the staging tables
    pub skip_staging: bool,

    /// Do not transform staged rows into the star schema
    pub skip_final: bool,

    /// Run the row-count queries after loading
    pub report_counts: bool,
}

/// Result of a load run; `None` for phases that did not run
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub staging: Option<PhaseSummary>,
    pub final_insert: Option<PhaseSummary>,
    pub report: Option<PhaseSummary>,
}

impl LoadSummary {
    /// Phases that actually ran, in execution order
    pub fn phases_run(&self) -> Vec<Phase> {
        [&self.staging, &self.final_insert, &self.report]
            .into_iter()
            .flatten()
            .map(|summary| summary.phase)
            .collect()
    }
}

/// Drop every table, then create every table.
///
/// Stops at the first failing statement; tables dropped or created before it
/// stay that way.
pub async fn setup_schema(
    db: &dyn Database,
    catalog: &QueryCatalog,
    sink: &mut dyn ReportSink,
) -> EtlResult<SetupSummary> {
    log::info!("Setting up schema on {}", db.db_type());
    let mut runner = StatementRunner::new(db, sink);

    let drop = runner
        .run_all(Phase::Drop, catalog.statements(Phase::Drop))
        .await?;
    let create = runner
        .run_all(Phase::Create, catalog.statements(Phase::Create))
        .await?;

    Ok(SetupSummary { drop, create })
}

/// Load staging tables, then the star schema, honoring the skip switches.
///
/// The two switches are independent: skipping staging still runs the final
/// inserts against whatever the staging tables already hold.
pub async fn load(
    db: &dyn Database,
    catalog: &QueryCatalog,
    options: LoadOptions,
    sink: &mut dyn ReportSink,
) -> EtlResult<LoadSummary> {
    log::info!("Loading warehouse on {} ({:?})", db.db_type(), options);
    let mut runner = StatementRunner::new(db, sink);
    let mut summary = LoadSummary::default();

    if options.skip_staging {
        runner
            .sink()
            .phase_skipped(Phase::Staging, SKIP_STAGING_MESSAGE);
    } else {
        summary.staging = Some(
            runner
                .run_all(Phase::Staging, catalog.statements(Phase::Staging))
                .await?,
        );
    }

    if options.skip_final {
        runner.sink().phase_skipped(Phase::Final, SKIP_FINAL_MESSAGE);
    } else {
        summary.final_insert = Some(
            runner
                .run_all(Phase::Final, catalog.statements(Phase::Final))
                .await?,
        );
    }

    if options.report_counts {
        summary.report = Some(
            runner
                .run_all(Phase::Report, catalog.statements(Phase::Report))
                .await?,
        );
    }

    Ok(summary)
}

/// Run `work`, then close the session whether or not it succeeded.
///
/// A failure from `work` wins over a failure to close; the close error is
/// only logged in that case.
pub async fn close_session<T, F>(db: &dyn Database, work: F) -> EtlResult<T>
where
    F: Future<Output = EtlResult<T>>,
{
    let outcome = work.await;
    let closed = db.close().await;

    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            log::warn!("Failed to close session after error: {}", close_err);
            Err(e)
        }
    }
}

#[cfg(test)]
#[path = "phase_test.rs"]
mod tests;
