//! Statement execution
//!
//! Failure policy: a statement the engine rejects ends its phase. Earlier
//! statements stay committed; nothing is rolled back or retried. Statements
//! without a result set are never fetched, so "no rows" after DDL or DML is
//! not an error, while a fetch failure on a row-producing query is.

use crate::error::{EtlError, EtlResult};
use crate::report::ReportSink;
use dwh_catalog::{Phase, Statement, StatementKind};
use dwh_db::{Database, QueryRows};
use std::time::{Duration, Instant};

/// Where a statement sits in its phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementContext {
    /// Phase the statement belongs to
    pub phase: Phase,
    /// 1-based position in the phase's list
    pub position: usize,
    /// Length of the phase's list
    pub total: usize,
}

/// Outcome of a single statement
#[derive(Debug, Clone)]
pub struct StatementReport {
    /// Position of the statement
    pub context: StatementContext,

    /// Table the statement targets
    pub table: String,

    /// Statement kind
    pub kind: StatementKind,

    /// SQL text that was executed
    pub sql: String,

    /// Wall-clock execution time, commit included
    pub elapsed: Duration,

    /// Rows affected, for statements without a result set
    pub rows_affected: Option<u64>,

    /// Rows returned, for queries
    pub rows: Option<QueryRows>,
}

/// Summary of one phase
#[derive(Debug, Clone)]
pub struct PhaseSummary {
    /// Phase that ran
    pub phase: Phase,

    /// Per-statement reports in execution order
    pub reports: Vec<StatementReport>,

    /// Total execution time
    pub duration: Duration,
}

impl PhaseSummary {
    /// Number of statements executed
    pub fn statements(&self) -> usize {
        self.reports.len()
    }

    /// Sum of rows affected across the phase
    pub fn rows_affected(&self) -> u64 {
        self.reports.iter().filter_map(|r| r.rows_affected).sum()
    }
}

/// Runs statements against one session, reporting each to a sink
pub struct StatementRunner<'a> {
    db: &'a dyn Database,
    sink: &'a mut dyn ReportSink,
}

impl<'a> StatementRunner<'a> {
    /// Create a new statement runner
    pub fn new(db: &'a dyn Database, sink: &'a mut dyn ReportSink) -> Self {
        Self { db, sink }
    }

    /// The sink reports go to
    pub fn sink(&mut self) -> &mut dyn ReportSink {
        &mut *self.sink
    }

    /// Execute one statement and commit it.
    ///
    /// Queries are fetched; everything else is executed for its side effect.
    pub async fn run(
        &mut self,
        context: StatementContext,
        statement: &Statement,
    ) -> EtlResult<StatementReport> {
        self.sink.statement_started(&context, statement);
        let start = Instant::now();

        let outcome = if statement.kind().returns_rows() {
            self.db
                .query_rows(statement.sql())
                .await
                .map(|rows| (None, Some(rows)))
        } else {
            self.db
                .execute(statement.sql())
                .await
                .map(|affected| (Some(affected), None))
        };
        let elapsed = start.elapsed();

        match outcome {
            Ok((rows_affected, rows)) => {
                let report = StatementReport {
                    context,
                    table: statement.table().to_string(),
                    kind: statement.kind(),
                    sql: statement.sql().to_string(),
                    elapsed,
                    rows_affected,
                    rows,
                };
                self.sink.statement_finished(&report);
                Ok(report)
            }
            Err(source) => {
                self.sink.statement_failed(&context, statement, &source, elapsed);
                Err(EtlError::StatementFailed {
                    phase: context.phase,
                    position: context.position,
                    total: context.total,
                    table: statement.table().to_string(),
                    sql: statement.sql().to_string(),
                    source,
                })
            }
        }
    }

    /// Execute a phase's statements in order, stopping at the first failure
    pub async fn run_all(
        &mut self,
        phase: Phase,
        statements: &[Statement],
    ) -> EtlResult<PhaseSummary> {
        let total = statements.len();
        self.sink.phase_started(phase, total);
        log::debug!("Running {} phase ({} statements)", phase, total);

        let start = Instant::now();
        let mut reports = Vec::with_capacity(total);

        for (idx, statement) in statements.iter().enumerate() {
            let context = StatementContext {
                phase,
                position: idx + 1,
                total,
            };
            reports.push(self.run(context, statement).await?);
        }

        let summary = PhaseSummary {
            phase,
            reports,
            duration: start.elapsed(),
        };
        self.sink.phase_finished(&summary);
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
