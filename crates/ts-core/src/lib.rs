//! Tablesink core: a record sink onto a keyed, column-typed table store.
//!
//! This crate provides:
//! - The store seam ([`store::StoreClient`] and friends) with an in-memory backend
//! - Record/column type mapping
//! - Schema construction from field names and a sample record
//! - Table mode resolution (CREATE / APPEND / OVERRIDE)
//! - Full-table read and clear
//! - Record insert and keyed delete
//! - Logging setup

pub mod clear;
pub mod connector;
pub mod logging;
pub mod read;
pub mod resolve;
pub mod schema;
pub mod store;
pub mod types;
pub mod write;

pub use clear::{clear_table, ClearReport, DeleteFailure};
pub use connector::TableConnector;
pub use logging::init_logging;
pub use read::{read_all, read_table};
pub use resolve::{use_table, ResolveOptions, TableAction, TableRequest};
pub use schema::build_schema;
pub use store::{MemoryStore, StoreClient, StoreSession, Table};
