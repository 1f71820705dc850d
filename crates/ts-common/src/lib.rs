//! Tablesink common types and errors.
//!
//! This crate provides the data model shared by the connector crates:
//! - Field values and fixed-arity records
//! - Store column types and column schemas
//! - Table open modes
//! - Session identifiers
//! - Common error types

pub mod error;
pub mod id;
pub mod mode;
pub mod record;
pub mod schema;

pub use error::{Error, Result, StoreError};
pub use id::SessionId;
pub use mode::TableMode;
pub use record::{Record, Value};
pub use schema::{ColumnSchema, ColumnType, Schema};
