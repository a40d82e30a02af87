//! Redshift backend over the Postgres wire protocol
//!
//! Statements go through the simple-query protocol (`sqlx::raw_sql`) so
//! vendor syntax such as `COPY ... IAM_ROLE` or `DISTSTYLE` reaches the
//! cluster untouched, and every value comes back in text form.

use crate::error::{DbError, DbResult};
use crate::traits::{Database, QueryRows};
use async_trait::async_trait;
use dwh_core::ClusterConfig;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow, PgSslMode};
use sqlx::{Column, Connection, Executor, Row};
use tokio::sync::Mutex;

/// A single session against a Redshift cluster
pub struct RedshiftBackend {
    conn: Mutex<Option<PgConnection>>,
}

impl RedshiftBackend {
    /// Connection options for a cluster
    pub fn connect_options(cluster: &ClusterConfig) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&cluster.host)
            .port(cluster.db_port)
            .username(&cluster.db_user)
            .password(&cluster.db_password)
            .database(&cluster.db_name)
            .ssl_mode(PgSslMode::Prefer)
    }

    /// Open a session. Fails with [`DbError::ConnectionError`] on bad
    /// credentials, an unreachable host or a wrong port.
    pub async fn connect(cluster: &ClusterConfig) -> DbResult<Self> {
        let options = Self::connect_options(cluster);
        let conn = PgConnection::connect_with(&options).await.map_err(|e| {
            DbError::ConnectionError(format!(
                "{}@{}:{}/{}: {}",
                cluster.db_user, cluster.host, cluster.db_port, cluster.db_name, e
            ))
        })?;

        log::info!(
            "Connected to {}:{}/{} as {}",
            cluster.host,
            cluster.db_port,
            cluster.db_name,
            cluster.db_user
        );

        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }
}

/// Render every column of a text-format row
fn row_values(row: &PgRow) -> DbResult<Vec<String>> {
    (0..row.len())
        .map(|idx| {
            row.try_get_unchecked::<Option<String>, _>(idx)
                .map(|value| value.unwrap_or_else(|| "NULL".to_string()))
                .map_err(|e| DbError::FetchError(format!("column {}: {}", idx, e)))
        })
        .collect()
}

#[async_trait]
impl Database for RedshiftBackend {
    async fn execute(&self, sql: &str) -> DbResult<u64> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(DbError::SessionClosed)?;

        let mut tx = conn
            .begin()
            .await
            .map_err(|e| DbError::ExecutionError(format!("BEGIN failed: {}", e)))?;
        let result = (&mut *tx)
            .execute(sqlx::raw_sql(sql))
            .await
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        tx.commit()
            .await
            .map_err(|e| DbError::ExecutionError(format!("COMMIT failed: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn query_rows(&self, sql: &str) -> DbResult<QueryRows> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(DbError::SessionClosed)?;

        let mut tx = conn
            .begin()
            .await
            .map_err(|e| DbError::ExecutionError(format!("BEGIN failed: {}", e)))?;
        let rows: Vec<PgRow> = (&mut *tx)
            .fetch_all(sqlx::raw_sql(sql))
            .await
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        tx.commit()
            .await
            .map_err(|e| DbError::ExecutionError(format!("COMMIT failed: {}", e)))?;

        let columns = rows
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|c| c.name().to_string())
                    .collect()
            })
            .unwrap_or_default();
        let rows = rows.iter().map(row_values).collect::<DbResult<_>>()?;

        Ok(QueryRows { columns, rows })
    }

    async fn close(&self) -> DbResult<()> {
        let conn = self.conn.lock().await.take();
        match conn {
            Some(conn) => {
                conn.close()
                    .await
                    .map_err(|e| DbError::ConnectionError(format!("close failed: {}", e)))?;
                log::debug!("Closed Redshift session");
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn db_type(&self) -> &'static str {
        "redshift"
    }
}

#[cfg(test)]
#[path = "redshift_test.rs"]
mod tests;
