//! Tablesink connector configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the connector config file
//! - Config resolution (explicit path → env → XDG → defaults)
//! - Environment overrides for master addresses and log filter
//! - Semantic validation

pub mod connector;
pub mod resolve;
pub mod validate;

pub use connector::{ClearPolicy, ConnectorConfig, LogFormat, LoggingConfig, TableConfig};
pub use resolve::{resolve_config, ConfigSource, ResolvedConfig};
pub use validate::{ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Check if a config schema version is compatible with current.
pub fn is_compatible(version: &str) -> bool {
    let major = |v: &str| {
        v.split('.')
            .next()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(0)
    };
    major(CONFIG_SCHEMA_VERSION) == major(version)
}
