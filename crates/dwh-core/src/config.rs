//! Configuration types and parsing for dwh.yml
//!
//! The file mirrors the sections of the classic `dwh.cfg`: `CLUSTER` holds the
//! connection parameters, `IAM_ROLE` the role the warehouse assumes when
//! reading from S3, and `S3` the object-storage locations of the raw data.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "dwh.yml";

/// Main configuration loaded from dwh.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Warehouse connection parameters
    #[serde(rename = "CLUSTER")]
    pub cluster: ClusterConfig,

    /// Role used by COPY to read from S3
    #[serde(rename = "IAM_ROLE")]
    pub iam_role: IamRoleConfig,

    /// Object-storage locations of the raw JSON data
    #[serde(rename = "S3")]
    pub s3: S3Config,
}

/// Warehouse connection parameters
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    /// Cluster endpoint host name
    #[serde(rename = "HOST")]
    pub host: String,

    /// Database name
    #[serde(rename = "DB_NAME")]
    pub db_name: String,

    /// Database user
    #[serde(rename = "DB_USER")]
    pub db_user: String,

    /// Database password
    #[serde(rename = "DB_PASSWORD")]
    pub db_password: String,

    /// Database port (Redshift listens on 5439 by default)
    #[serde(rename = "DB_PORT")]
    pub db_port: u16,
}

// Hand-written so the password never ends up in verbose output.
impl std::fmt::Debug for ClusterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterConfig")
            .field("host", &self.host)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &"***")
            .field("db_port", &self.db_port)
            .finish()
    }
}

/// IAM role configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IamRoleConfig {
    /// Role ARN, e.g. `arn:aws:iam::123456789012:role/dwhRole`
    #[serde(rename = "ARN")]
    pub arn: String,
}

/// S3 source locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct S3Config {
    /// Prefix of the event log JSON files
    #[serde(rename = "LOG_DATA")]
    pub log_data: String,

    /// JSONPath mapping file for the event logs
    #[serde(rename = "LOG_JSONPATH")]
    pub log_jsonpath: String,

    /// Prefix of the song metadata JSON files
    #[serde(rename = "SONG_DATA")]
    pub song_data: String,

    /// Region of the source bucket when it differs from the cluster's
    #[serde(rename = "REGION", default)]
    pub region: Option<String>,
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::from_yaml(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the configured password, e.g. with one taken from the environment
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.cluster.db_password = password.into();
        self
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        let required = [
            ("CLUSTER.HOST", &self.cluster.host),
            ("CLUSTER.DB_NAME", &self.cluster.db_name),
            ("CLUSTER.DB_USER", &self.cluster.db_user),
            ("IAM_ROLE.ARN", &self.iam_role.arn),
            ("S3.LOG_DATA", &self.s3.log_data),
            ("S3.LOG_JSONPATH", &self.s3.log_jsonpath),
            ("S3.SONG_DATA", &self.s3.song_data),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{} cannot be empty", key),
                });
            }
        }

        if self.cluster.db_port == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "CLUSTER.DB_PORT must be a non-zero port number".to_string(),
            });
        }

        for (key, uri) in [
            ("S3.LOG_DATA", &self.s3.log_data),
            ("S3.SONG_DATA", &self.s3.song_data),
        ] {
            if !uri.starts_with("s3://") {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{} must be an s3:// URI, got '{}'", key, uri),
                });
            }
        }

        if self.s3.region.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "S3.REGION cannot be empty when present".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
