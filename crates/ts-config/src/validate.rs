//! Semantic validation of connector configuration.

use std::collections::HashSet;
use thiserror::Error;
use ts_common::TableMode;

use crate::connector::ConnectorConfig;

/// Configuration problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("incompatible config schema version {found} (expected {expected})")]
    IncompatibleVersion { found: String, expected: String },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// All problems found in one pass; empty means valid.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
}

/// Validate a config, collecting every problem instead of stopping at the first.
pub fn validate(config: &ConnectorConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if !crate::is_compatible(&config.schema_version) {
        errors.push(ValidationError::IncompatibleVersion {
            found: config.schema_version.clone(),
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
        });
    }

    if config.master_addresses.is_empty() {
        errors.push(invalid("master_addresses", "at least one address is required"));
    }
    for (i, addr) in config.master_addresses.iter().enumerate() {
        if addr.trim().is_empty() {
            errors.push(invalid(format!("master_addresses[{}]", i), "empty address"));
        }
    }

    if config.num_replicas == Some(0) {
        errors.push(invalid("num_replicas", "must be at least 1"));
    }

    if config.logging.level.trim().is_empty() {
        errors.push(invalid("logging.level", "empty level"));
    }

    if let Some(table) = &config.table {
        if table.name.trim().is_empty() {
            errors.push(invalid("table.name", "empty table name"));
        }
        if table.mode == TableMode::Create && table.fields.is_empty() {
            errors.push(invalid("table.fields", "CREATE mode needs a field list"));
        }
        let mut seen = HashSet::new();
        for (i, field) in table.fields.iter().enumerate() {
            if field.is_empty() {
                errors.push(invalid(format!("table.fields[{}]", i), "empty field name"));
            } else if !seen.insert(field.as_str()) {
                errors.push(invalid(
                    format!("table.fields[{}]", i),
                    format!("duplicate field name '{}'", field),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl From<ValidationError> for ts_common::Error {
    fn from(err: ValidationError) -> Self {
        ts_common::Error::Config(err.to_string())
    }
}
