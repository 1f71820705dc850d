//! Type mapping between record values and store column types.
//!
//! Only three column types are mapped: `string`, `int32` and `bool`.
//! Everything else is an explicit error in both directions.

use ts_common::{ColumnType, Error, Record, Result, StoreError, Value};

use crate::store::RowResult;

/// Pulls one cell out of a scanned row as a [`Value`].
pub type CellReader = fn(&RowResult, &str) -> std::result::Result<Value, StoreError>;

/// Store column type for a sample value, or `None` when the value has no mapping.
pub fn infer_type(value: &Value) -> Option<ColumnType> {
    match value {
        Value::Str(_) => Some(ColumnType::String),
        Value::Int32(_) => Some(ColumnType::Int32),
        Value::Bool(_) => Some(ColumnType::Bool),
        Value::Unsupported(_) => None,
    }
}

/// Column type of the field at `pos` of a sample record.
pub fn field_type(record: &Record, pos: usize) -> Result<ColumnType> {
    let value = record.field(pos).ok_or_else(|| {
        if pos < record.arity() {
            Error::UnsupportedFieldType {
                position: pos,
                type_name: "null".to_string(),
            }
        } else {
            Error::FieldOutOfRange {
                position: pos,
                arity: record.arity(),
            }
        }
    })?;
    infer_type(value).ok_or_else(|| Error::UnsupportedFieldType {
        position: pos,
        type_name: value.type_name().to_string(),
    })
}

/// Accessor for a column given its declared type name.
pub fn cell_reader(column: &str, type_name: &str) -> Result<CellReader> {
    match ColumnType::from_name(type_name) {
        Some(ColumnType::String) => Ok(read_string),
        Some(ColumnType::Int32) => Ok(read_int32),
        Some(ColumnType::Bool) => Ok(read_bool),
        _ => Err(Error::UnsupportedColumnType {
            column: column.to_string(),
            type_name: type_name.to_string(),
        }),
    }
}

fn read_string(row: &RowResult, column: &str) -> std::result::Result<Value, StoreError> {
    row.get_string(column).map(Value::Str)
}

fn read_int32(row: &RowResult, column: &str) -> std::result::Result<Value, StoreError> {
    row.get_int(column).map(Value::Int32)
}

fn read_bool(row: &RowResult, column: &str) -> std::result::Result<Value, StoreError> {
    row.get_bool(column).map(Value::Bool)
}
