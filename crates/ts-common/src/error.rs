//! Error types for Tablesink.

use thiserror::Error;

use crate::mode::TableMode;

/// Result type alias for Tablesink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Tablesink.
#[derive(Error, Debug)]
pub enum Error {
    // Precondition errors (10-19)
    #[error("table '{table}' already exists")]
    TableAlreadyExists { table: String },

    #[error("table '{table}' does not exist, cannot open it in {mode} mode")]
    TableNotFound { table: String, mode: TableMode },

    #[error("missing \"fields\" parameter: CREATE of table '{table}' needs a non-empty field list")]
    MissingFields { table: String },

    #[error("missing required schema parameters: {0}")]
    MissingSchemaParameters(String),

    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    #[error("invalid table mode '{0}' (expected CREATE, APPEND or OVERRIDE)")]
    InvalidMode(String),

    // Type errors (20-29)
    #[error("unsupported field type '{type_name}' at position {position}")]
    UnsupportedFieldType { position: usize, type_name: String },

    #[error("unsupported column type '{type_name}' for column '{column}'")]
    UnsupportedColumnType { column: String, type_name: String },

    #[error("type mismatch for column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    // Record errors (30-39)
    #[error("field position {position} out of range for record of arity {arity}")]
    FieldOutOfRange { position: usize, arity: usize },

    #[error("record arity {actual} does not match the {expected} columns of table '{table}'")]
    ArityMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error("field at position {position} is not set")]
    UnsetField { position: usize },

    // Store errors (40-49)
    #[error("store operation {operation} failed on table '{table}': {source}")]
    Store {
        operation: &'static str,
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("clearing table '{table}' left rows behind: {failed} of {attempted} deletes failed")]
    ClearIncomplete {
        table: String,
        failed: usize,
        attempted: usize,
    },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the error code for this error type.
    pub fn code(&self) -> u32 {
        match self {
            Error::TableAlreadyExists { .. } => 10,
            Error::TableNotFound { .. } => 11,
            Error::MissingFields { .. } => 12,
            Error::MissingSchemaParameters(_) => 13,
            Error::DuplicateField(_) => 14,
            Error::InvalidMode(_) => 15,
            Error::UnsupportedFieldType { .. } => 20,
            Error::UnsupportedColumnType { .. } => 21,
            Error::TypeMismatch { .. } => 22,
            Error::FieldOutOfRange { .. } => 30,
            Error::ArityMismatch { .. } => 31,
            Error::UnsetField { .. } => 32,
            Error::Store { .. } => 40,
            Error::ClearIncomplete { .. } => 41,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::Config(_) => 62,
        }
    }

    /// True for table-existence/mode mismatches and missing schema input.
    ///
    /// None of these abort the process; the caller decides what to do.
    pub fn is_precondition(&self) -> bool {
        (10..20).contains(&self.code())
    }

    /// True when a field or column type falls outside {string, int32, bool}.
    pub fn is_unsupported_type(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedFieldType { .. } | Error::UnsupportedColumnType { .. }
        )
    }

    /// Attach operation and table context to a store-level failure.
    pub fn store(operation: &'static str, table: impl Into<String>, source: StoreError) -> Self {
        Error::Store {
            operation,
            table: table.into(),
            source,
        }
    }
}

/// Failures reported by a store client backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("table already exists: {0}")]
    TableAlreadyExists(String),

    #[error("no row with key {0}")]
    KeyNotFound(String),

    #[error("row with key {0} already present")]
    KeyAlreadyPresent(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("column '{column}' has type {actual}, requested as {requested}")]
    TypeMismatch {
        column: String,
        actual: String,
        requested: String,
    },

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("internal store error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_codes_are_grouped() {
        let err = Error::TableAlreadyExists {
            table: "t".to_string(),
        };
        assert_eq!(err.code(), 10);
        assert!(err.is_precondition());

        let err = Error::TableNotFound {
            table: "t".to_string(),
            mode: TableMode::Append,
        };
        assert!(err.is_precondition());
        assert!(!err.is_unsupported_type());
    }

    #[test]
    fn store_error_is_not_precondition() {
        let err = Error::store("open_table", "t", StoreError::Unavailable("down".into()));
        assert_eq!(err.code(), 40);
        assert!(!err.is_precondition());
    }

    #[test]
    fn store_error_display_carries_context() {
        let err = Error::store(
            "delete_table",
            "events",
            StoreError::TableNotFound("events".into()),
        );
        let msg = err.to_string();
        assert!(msg.contains("delete_table"));
        assert!(msg.contains("events"));
        assert!(msg.contains("table not found"));
    }

    #[test]
    fn not_found_display_names_mode() {
        let err = Error::TableNotFound {
            table: "t".to_string(),
            mode: TableMode::Override,
        };
        assert!(err.to_string().contains("does not exist"));
        assert!(err.to_string().contains("OVERRIDE"));
    }

    #[test]
    fn unsupported_type_classification() {
        let err = Error::UnsupportedColumnType {
            column: "price".into(),
            type_name: "double".into(),
        };
        assert!(err.is_unsupported_type());
        assert_eq!(err.code(), 21);
    }
}
