//! Runtime context for the entry points

use anyhow::{Context, Result};
use dwh_catalog::QueryCatalog;
use dwh_core::Config;
use dwh_db::{Database, DryRunBackend, RedshiftBackend};
use dwh_etl::{LogSink, ReportSink, StdoutSink};

use crate::cli::CommonArgs;

/// Configuration and rendered statements for one invocation
pub struct RuntimeContext {
    /// Loaded configuration, with any password override applied
    pub config: Config,

    /// Every statement the run may execute
    pub catalog: QueryCatalog,

    /// Record statements instead of connecting
    pub dry_run: bool,

    /// Report progress through the log only
    pub quiet: bool,
}

impl RuntimeContext {
    /// Load configuration and build the catalog from common arguments
    pub fn new(args: &CommonArgs) -> Result<Self> {
        let mut config = Config::load(&args.config).with_context(|| {
            format!(
                "Failed to load configuration file {}",
                args.config.display()
            )
        })?;

        if let Some(password) = args.db_password.as_deref().filter(|p| !p.is_empty()) {
            log::debug!("Using database password from DWH_DB_PASSWORD");
            config = config.with_password(password);
        }

        let catalog = QueryCatalog::new(&config).context("Failed to build query catalog")?;

        Ok(Self {
            config,
            catalog,
            dry_run: args.dry_run,
            quiet: args.quiet,
        })
    }

    /// Open the warehouse session, or a recording one for dry runs
    pub async fn connect(&self) -> Result<Box<dyn Database>> {
        if self.dry_run {
            log::info!("Dry run: statements will be printed, not executed");
            return Ok(Box::new(DryRunBackend::new()));
        }

        let cluster = &self.config.cluster;
        log::info!(
            "Connecting to {}:{}/{} as {}",
            cluster.host,
            cluster.db_port,
            cluster.db_name,
            cluster.db_user
        );
        let db = RedshiftBackend::connect(cluster)
            .await
            .context("Failed to connect to warehouse")?;
        Ok(Box::new(db))
    }

    /// Progress reporter for this invocation
    pub fn report_sink(&self) -> Box<dyn ReportSink> {
        if self.quiet {
            Box::new(LogSink)
        } else {
            Box::new(StdoutSink::stdout())
        }
    }
}
