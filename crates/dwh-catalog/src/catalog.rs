//! Ordered statement lists built from configuration

use crate::error::{CatalogError, CatalogResult};
use crate::statement::{Statement, StatementKind};
use crate::tables::{find_table, TableDef, TableKind, STAR_SCHEMA};
use dwh_core::sql_utils::quote_ident;
use dwh_core::{Config, TableDag};
use dwh_jinja::{TemplateEnvironment, TemplateParams};
use std::fmt;

/// Named statement list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Drop every table, referencing tables first
    Drop,
    /// Create every table, referenced tables first
    Create,
    /// COPY raw JSON from S3 into the staging tables
    Staging,
    /// Transform staged rows into the dimension and fact tables
    Final,
    /// Row counts per table
    Report,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Drop => write!(f, "drop"),
            Phase::Create => write!(f, "create"),
            Phase::Staging => write!(f, "staging"),
            Phase::Final => write!(f, "final"),
            Phase::Report => write!(f, "report"),
        }
    }
}

/// Every statement the loader runs, rendered and ordered
#[derive(Debug, Clone)]
pub struct QueryCatalog {
    drop: Vec<Statement>,
    create: Vec<Statement>,
    staging_load: Vec<Statement>,
    final_insert: Vec<Statement>,
    report: Vec<Statement>,
}

impl QueryCatalog {
    /// Build the catalog for the star schema from configuration
    pub fn new(config: &Config) -> CatalogResult<Self> {
        Self::build(STAR_SCHEMA, TemplateParams::from_config(config))
    }

    /// Build a catalog for an arbitrary set of table definitions.
    ///
    /// Every template is rendered here, exactly once; nothing is rendered
    /// lazily at execution time.
    pub fn build(tables: &[TableDef], params: TemplateParams) -> CatalogResult<Self> {
        let dag = TableDag::build(
            tables
                .iter()
                .map(|t| (t.name, t.references.iter().copied())),
        )?;
        let creation_order = dag.creation_order()?;

        let mut env = TemplateEnvironment::new(params);
        for table in tables {
            let load = table.load.iter();
            for template in std::iter::once(&table.create).chain(load) {
                env.add_template(template.name, template.source)
                    .map_err(|source| CatalogError::Render {
                        table: table.name.to_string(),
                        source,
                    })?;
            }
        }

        let ordered: Vec<&TableDef> = creation_order
            .iter()
            .map(|name| {
                find_table(tables, name).ok_or_else(|| CatalogError::MissingDefinition {
                    table: name.clone(),
                })
            })
            .collect::<CatalogResult<_>>()?;

        let render = |table: &TableDef, template: &str| -> CatalogResult<String> {
            env.render_named(template)
                .map_err(|source| CatalogError::Render {
                    table: table.name.to_string(),
                    source,
                })
        };

        let mut create = Vec::with_capacity(ordered.len());
        let mut staging_load = Vec::new();
        let mut final_insert = Vec::new();
        let mut report = Vec::with_capacity(ordered.len());

        for &table in &ordered {
            create.push(Statement::new(
                table.name,
                StatementKind::Create,
                render(table, table.create.name)?,
            ));

            if let Some(load) = &table.load {
                let sql = render(table, load.name)?;
                match table.kind {
                    TableKind::Staging => {
                        staging_load.push(Statement::new(table.name, StatementKind::Copy, sql))
                    }
                    TableKind::Dimension | TableKind::Fact => {
                        final_insert.push(Statement::new(table.name, StatementKind::Insert, sql))
                    }
                }
            }

            report.push(Statement::new(
                table.name,
                StatementKind::Query,
                format!(
                    "SELECT '{}' AS table_name, COUNT(*) AS row_count FROM {}",
                    table.name,
                    quote_ident(table.name)
                ),
            ));
        }

        let drop = dag
            .drop_order()?
            .into_iter()
            .map(|name| {
                let sql = format!("DROP TABLE IF EXISTS {}", quote_ident(&name));
                Statement::new(name, StatementKind::Drop, sql)
            })
            .collect();

        log::debug!(
            "Built query catalog for {} tables ({} staging loads, {} final inserts)",
            ordered.len(),
            staging_load.len(),
            final_insert.len()
        );

        Ok(Self {
            drop,
            create,
            staging_load,
            final_insert,
            report,
        })
    }

    /// `DROP TABLE IF EXISTS` for every table, fact table first
    pub fn drop_statements(&self) -> &[Statement] {
        &self.drop
    }

    /// `CREATE TABLE` for every table, staging first and fact table last
    pub fn create_statements(&self) -> &[Statement] {
        &self.create
    }

    /// COPY statements loading the staging tables
    pub fn staging_load_statements(&self) -> &[Statement] {
        &self.staging_load
    }

    /// Transform statements filling the dimensions, then the fact table
    pub fn final_insert_statements(&self) -> &[Statement] {
        &self.final_insert
    }

    /// Row-count queries, one per table
    pub fn report_statements(&self) -> &[Statement] {
        &self.report
    }

    /// Statement list for a phase
    pub fn statements(&self, phase: Phase) -> &[Statement] {
        match phase {
            Phase::Drop => self.drop_statements(),
            Phase::Create => self.create_statements(),
            Phase::Staging => self.staging_load_statements(),
            Phase::Final => self.final_insert_statements(),
            Phase::Report => self.report_statements(),
        }
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
