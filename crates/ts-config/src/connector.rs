//! Connector configuration types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use ts_common::TableMode;

use crate::validate::ValidationError;

/// Complete connector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Store master addresses handed to the client at bootstrap.
    #[serde(default = "default_master_addresses")]
    pub master_addresses: Vec<String>,

    /// Target table, when the connector is bound to one.
    #[serde(default)]
    pub table: Option<TableConfig>,

    #[serde(default)]
    pub clear_policy: ClearPolicy,

    /// Replication factor for tables created by the connector.
    #[serde(default)]
    pub num_replicas: Option<u32>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

fn default_master_addresses() -> Vec<String> {
    vec!["localhost:7051".to_string()]
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            master_addresses: default_master_addresses(),
            table: None,
            clear_policy: ClearPolicy::default(),
            num_replicas: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl ConnectorConfig {
    /// Load a config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_json(&content)
    }

    /// Parse a config from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }
}

/// Table binding: name, open mode and (for CREATE) the ordered field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub name: String,
    pub mode: TableMode,
    /// Ordered field names; position 0 is the primary key.
    #[serde(default)]
    pub fields: Vec<String>,
}

/// What the clearer does when a single row delete fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearPolicy {
    /// Attempt every delete and report all failures.
    #[default]
    BestEffort,
    /// Stop at the first failed delete.
    AbortOnFirstFailure,
}

impl fmt::Display for ClearPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClearPolicy::BestEffort => write!(f, "best_effort"),
            ClearPolicy::AbortOnFirstFailure => write!(f, "abort_on_first_failure"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    /// JSON Lines for structured log shipping.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Per-target level overrides, e.g. `{"ts_core::clear": "debug"}`.
    #[serde(default)]
    pub targets: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            targets: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive string: base level followed by per-target overrides.
    pub fn filter_directives(&self) -> String {
        let mut directives = vec![self.level.clone()];
        for (target, level) in &self.targets {
            directives.push(format!("{}={}", target, level));
        }
        directives.join(",")
    }
}
