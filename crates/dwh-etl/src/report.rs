//! Reporting of statement text, timing and results

use crate::runner::{PhaseSummary, StatementContext, StatementReport};
use dwh_catalog::{Phase, Statement, StatementKind};
use dwh_core::sql_utils::single_line;
use dwh_db::DbError;
use std::io::{self, Write};
use std::time::Duration;

/// Receives progress events from the runner and the phase drivers.
///
/// Only statement results are required; the phase hooks default to no-ops.
pub trait ReportSink: Send {
    /// A phase is about to run `total` statements
    fn phase_started(&mut self, _phase: Phase, _total: usize) {}

    /// A phase was skipped by request
    fn phase_skipped(&mut self, _phase: Phase, _reason: &str) {}

    /// A statement is about to be sent
    fn statement_started(&mut self, context: &StatementContext, statement: &Statement);

    /// A statement committed
    fn statement_finished(&mut self, report: &StatementReport);

    /// A statement was rejected; the phase stops here
    fn statement_failed(
        &mut self,
        context: &StatementContext,
        statement: &Statement,
        error: &DbError,
        elapsed: Duration,
    );

    /// Every statement in the phase committed
    fn phase_finished(&mut self, _summary: &PhaseSummary) {}
}

/// Human-readable progress written to a terminal or any other writer
pub struct StdoutSink<W: Write + Send> {
    out: W,
}

impl StdoutSink<io::Stdout> {
    /// Console sink writing to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> StdoutSink<W> {
    /// Create a console sink over any writer
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    // Progress output is best effort; a closed stdout must not abort a load.
    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.out, "{}", text);
    }
}

impl<W: Write + Send> ReportSink for StdoutSink<W> {
    fn phase_started(&mut self, phase: Phase, total: usize) {
        self.line(format_args!("\n== {} ({} statements) ==", phase, total));
    }

    fn phase_skipped(&mut self, _phase: Phase, reason: &str) {
        self.line(format_args!("{}", reason));
    }

    fn statement_started(&mut self, context: &StatementContext, statement: &Statement) {
        self.line(format_args!(
            "Running query [{} {}/{}] {}:",
            context.phase,
            context.position,
            context.total,
            statement.table()
        ));
        self.line(format_args!("{}", statement.sql()));
    }

    fn statement_finished(&mut self, report: &StatementReport) {
        let mut status = format!(
            "  ✓ {} ({}) [{}ms]",
            report.table,
            report.kind,
            report.elapsed.as_millis()
        );
        if let Some(affected) = report.rows_affected {
            if report.kind == StatementKind::Insert {
                status.push_str(&format!(" {} rows", affected));
            }
        }
        self.line(format_args!("{}", status));

        if let Some(rows) = &report.rows {
            if !rows.columns.is_empty() {
                self.line(format_args!("    {}", rows.columns.join(" | ")));
            }
            for row in &rows.rows {
                self.line(format_args!("    {}", row.join(" | ")));
            }
        }
    }

    fn statement_failed(
        &mut self,
        _context: &StatementContext,
        statement: &Statement,
        error: &DbError,
        elapsed: Duration,
    ) {
        self.line(format_args!(
            "  ✗ {} ({}) - {} [{}ms]",
            statement.table(),
            statement.kind(),
            error,
            elapsed.as_millis()
        ));
    }

    fn phase_finished(&mut self, summary: &PhaseSummary) {
        self.line(format_args!(
            "Finished {}: {} statements in {:.2}s",
            summary.phase,
            summary.statements(),
            summary.duration.as_secs_f64()
        ));
        let _ = self.out.flush();
    }
}

/// Sends every event to the `log` facade, one line per event
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn phase_started(&mut self, phase: Phase, total: usize) {
        log::info!("Starting {} phase ({} statements)", phase, total);
    }

    fn phase_skipped(&mut self, phase: Phase, reason: &str) {
        log::info!("Skipping {} phase: {}", phase, reason);
    }

    fn statement_started(&mut self, context: &StatementContext, statement: &Statement) {
        log::info!(
            "Running query [{} {}/{}] {}",
            context.phase,
            context.position,
            context.total,
            statement.table()
        );
        log::debug!("{}", single_line(statement.sql()));
    }

    fn statement_finished(&mut self, report: &StatementReport) {
        match (&report.rows, report.rows_affected) {
            (Some(rows), _) => log::info!(
                "{} ({}) returned {} rows in {}ms",
                report.table,
                report.kind,
                rows.len(),
                report.elapsed.as_millis()
            ),
            (None, Some(affected)) => log::info!(
                "{} ({}) affected {} rows in {}ms",
                report.table,
                report.kind,
                affected,
                report.elapsed.as_millis()
            ),
            (None, None) => log::info!(
                "{} ({}) done in {}ms",
                report.table,
                report.kind,
                report.elapsed.as_millis()
            ),
        }
    }

    fn statement_failed(
        &mut self,
        context: &StatementContext,
        statement: &Statement,
        error: &DbError,
        elapsed: Duration,
    ) {
        log::error!(
            "[{} {}/{}] {} ({}) failed after {}ms: {}",
            context.phase,
            context.position,
            context.total,
            statement.table(),
            statement.kind(),
            elapsed.as_millis(),
            error
        );
    }

    fn phase_finished(&mut self, summary: &PhaseSummary) {
        log::info!(
            "Finished {} phase: {} statements, {} rows affected, {}ms",
            summary.phase,
            summary.statements(),
            summary.rows_affected(),
            summary.duration.as_millis()
        );
    }
}

/// Event captured by [`RecordingSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    PhaseStarted { phase: Phase, total: usize },
    PhaseSkipped { phase: Phase, reason: String },
    StatementStarted { phase: Phase, position: usize, table: String },
    StatementFinished { phase: Phase, position: usize, table: String },
    StatementFailed { phase: Phase, position: usize, table: String, error: String },
    PhaseFinished { phase: Phase, statements: usize },
}

/// Keeps every event in memory, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Phases that started, in order
    pub fn started_phases(&self) -> Vec<Phase> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::PhaseStarted { phase, .. } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    /// Phases that were skipped, in order
    pub fn skipped_phases(&self) -> Vec<Phase> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::PhaseSkipped { phase, .. } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    /// Skip messages, in order
    pub fn skip_reasons(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::PhaseSkipped { reason, .. } => Some(reason.as_str()),
                _ => None,
            })
            .collect()
    }

    /// `(phase, table)` of every statement that committed
    pub fn finished_statements(&self) -> Vec<(Phase, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::StatementFinished { phase, table, .. } => Some((*phase, table.clone())),
                _ => None,
            })
            .collect()
    }
}

impl ReportSink for RecordingSink {
    fn phase_started(&mut self, phase: Phase, total: usize) {
        self.events.push(SinkEvent::PhaseStarted { phase, total });
    }

    fn phase_skipped(&mut self, phase: Phase, reason: &str) {
        self.events.push(SinkEvent::PhaseSkipped {
            phase,
            reason: reason.to_string(),
        });
    }

    fn statement_started(&mut self, context: &StatementContext, statement: &Statement) {
        self.events.push(SinkEvent::StatementStarted {
            phase: context.phase,
            position: context.position,
            table: statement.table().to_string(),
        });
    }

    fn statement_finished(&mut self, report: &StatementReport) {
        self.events.push(SinkEvent::StatementFinished {
            phase: report.context.phase,
            position: report.context.position,
            table: report.table.clone(),
        });
    }

    fn statement_failed(
        &mut self,
        context: &StatementContext,
        statement: &Statement,
        error: &DbError,
        _elapsed: Duration,
    ) {
        self.events.push(SinkEvent::StatementFailed {
            phase: context.phase,
            position: context.position,
            table: statement.table().to_string(),
            error: error.to_string(),
        });
    }

    fn phase_finished(&mut self, summary: &PhaseSummary) {
        self.events.push(SinkEvent::PhaseFinished {
            phase: summary.phase,
            statements: summary.statements(),
        });
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
