//! Column schema construction from a field list and a sample record.

use std::collections::HashSet;
use ts_common::{ColumnSchema, Error, Record, Result, Schema};

use crate::types::field_type;

/// Build the column schema for a new table.
///
/// Column `i` is named `fields[i]` and typed from `sample`'s value at `i`.
/// `fields[0]` becomes the key column and always lands at schema position 0.
pub fn build_schema<S: AsRef<str>>(fields: &[S], sample: Option<&Record>) -> Result<Schema> {
    let key_name = match fields.first().map(AsRef::as_ref) {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(Error::MissingSchemaParameters(
                "field list is empty or its first name is empty".to_string(),
            ))
        }
    };
    let sample = sample.ok_or_else(|| {
        Error::MissingSchemaParameters("a sample record is required to infer column types".into())
    })?;
    if sample.arity() != fields.len() {
        return Err(Error::MissingSchemaParameters(format!(
            "sample record has {} fields but {} field names were given",
            sample.arity(),
            fields.len()
        )));
    }

    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(fields.len());
    for (pos, name) in fields.iter().map(AsRef::as_ref).enumerate() {
        if name.is_empty() {
            return Err(Error::MissingSchemaParameters(format!(
                "field name at position {} is empty",
                pos
            )));
        }
        if !seen.insert(name) {
            return Err(Error::DuplicateField(name.to_string()));
        }

        let column = ColumnSchema::new(name, field_type(sample, pos)?);
        if name == key_name {
            // The store only accepts key columns at the front.
            columns.insert(0, column.key(true));
        } else {
            columns.push(column);
        }
    }

    Schema::new(columns)
}
