//! Table emptying by per-row delete.
//!
//! All rows are read before the first delete is issued, so a scan never
//! observes its own deletes. Deletes are then applied one at a time.
//!
//! A failed delete is handled per [`ClearPolicy`]: `BestEffort` records it and
//! moves on, `AbortOnFirstFailure` stops. Either way the failures end up in the
//! returned [`ClearReport`]; nothing is swallowed.

use serde::Serialize;
use tracing::{info, warn};
use ts_common::{ColumnType, Error, Record, Result, Value};
use ts_config::ClearPolicy;

use crate::read::read_all;
use crate::resolve::open_table;
use crate::store::{Operation, StoreClient, StoreSession, Table};
use crate::types::field_type;

/// A delete that the store rejected.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeleteFailure {
    pub key: Value,
    pub error: String,
}

/// Outcome of clearing one table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClearReport {
    pub table: String,
    pub policy: ClearPolicy,
    pub rows_read: usize,
    pub attempted: usize,
    pub rows_deleted: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<DeleteFailure>,
    /// Set when the session rejected the final flush; applied deletes may not
    /// have reached the store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flush_error: Option<String>,
}

impl ClearReport {
    /// True when every row read was deleted and the deletes were flushed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
            && self.flush_error.is_none()
            && self.rows_deleted == self.rows_read
    }

    /// Failed deletes plus a failed flush.
    pub fn failed(&self) -> usize {
        self.failures.len() + usize::from(self.flush_error.is_some())
    }
}

/// Build a delete for `record`, keyed on its position-0 value.
pub fn build_delete(table: &Table, key_column: &str, record: &Record) -> Result<Operation> {
    let mut delete = table.new_delete();
    let key = record.field(0).ok_or(Error::UnsetField { position: 0 })?;
    let row = delete.row_mut();
    match (field_type(record, 0)?, key) {
        (ColumnType::String, Value::Str(s)) => row.add_string(key_column, s.as_str()),
        (ColumnType::Int32, Value::Int32(v)) => row.add_int(key_column, *v),
        (ColumnType::Bool, Value::Bool(v)) => row.add_bool(key_column, *v),
        (ty, other) => {
            return Err(Error::TypeMismatch {
                column: key_column.to_string(),
                expected: ty.name().to_string(),
                actual: other.type_name().to_string(),
            })
        }
    }
    Ok(delete)
}

/// Remove every row of `name`.
pub fn clear_table(
    client: &dyn StoreClient,
    session: &dyn StoreSession,
    name: &str,
    policy: ClearPolicy,
) -> Result<ClearReport> {
    let table = open_table(client, name)?;
    let records = read_all(client, &table)?;

    let key_column = table
        .schema()
        .primary_key_columns()
        .next()
        .map(|c| c.name.clone())
        .ok_or_else(|| {
            Error::MissingSchemaParameters(format!("table '{}' has no primary key column", name))
        })?;

    let deletes = records
        .iter()
        .map(|record| build_delete(&table, &key_column, record))
        .collect::<Result<Vec<_>>>()?;

    let mut report = ClearReport {
        table: name.to_string(),
        policy,
        rows_read: records.len(),
        attempted: 0,
        rows_deleted: 0,
        failures: Vec::new(),
        flush_error: None,
    };

    for delete in deletes {
        let key = delete
            .row()
            .get(&key_column)
            .cloned()
            .unwrap_or_else(|| Value::unsupported("missing"));
        report.attempted += 1;
        match session.apply(delete) {
            Ok(()) => report.rows_deleted += 1,
            Err(e) => {
                warn!(table = name, key = %key, error = %e, "row delete failed");
                report.failures.push(DeleteFailure {
                    key,
                    error: e.to_string(),
                });
                if policy == ClearPolicy::AbortOnFirstFailure {
                    break;
                }
            }
        }
    }

    if let Err(e) = session.flush() {
        warn!(table = name, error = %e, "flush after deletes failed");
        report.flush_error = Some(e.to_string());
    }

    if report.is_complete() {
        info!(table = name, rows = report.rows_deleted, "table emptied");
    } else {
        warn!(
            table = name,
            deleted = report.rows_deleted,
            failed = report.failed(),
            read = report.rows_read,
            %policy,
            "table only partially emptied"
        );
    }
    Ok(report)
}
