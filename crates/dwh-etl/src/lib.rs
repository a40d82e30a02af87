//! dwh-etl - Statement execution and phase drivers
//!
//! [`StatementRunner`] executes one statement at a time against a session and
//! reports text, timing and rows to a [`ReportSink`]. The phase drivers in
//! [`phase`] sequence the catalog's statement lists: [`setup_schema`] drops
//! and recreates every table, [`load`] copies staging data and fills the star
//! schema.

pub mod error;
pub mod phase;
pub mod report;
pub mod runner;

pub use error::{EtlError, EtlResult};
pub use phase::{close_session, load, setup_schema, LoadOptions, LoadSummary, SetupSummary};
pub use report::{LogSink, RecordingSink, ReportSink, SinkEvent, StdoutSink};
pub use runner::{PhaseSummary, StatementContext, StatementReport, StatementRunner};
