//! Store column types and column schemas.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};

/// Native column types of the table store.
///
/// The connector maps only `String`, `Int32` and `Bool`; the remaining
/// variants describe tables created by other writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    String,
    Int8,
    Int16,
    Int32,
    Int64,
    Bool,
    Float,
    Double,
    Binary,
    UnixtimeMicros,
}

impl ColumnType {
    /// Canonical store type name.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Int8 => "int8",
            ColumnType::Int16 => "int16",
            ColumnType::Int32 => "int32",
            ColumnType::Int64 => "int64",
            ColumnType::Bool => "bool",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::Binary => "binary",
            ColumnType::UnixtimeMicros => "unixtime_micros",
        }
    }

    /// Look up a type by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "string" => ColumnType::String,
            "int8" => ColumnType::Int8,
            "int16" => ColumnType::Int16,
            "int32" => ColumnType::Int32,
            "int64" => ColumnType::Int64,
            "bool" => ColumnType::Bool,
            "float" => ColumnType::Float,
            "double" => ColumnType::Double,
            "binary" => ColumnType::Binary,
            "unixtime_micros" => ColumnType::UnixtimeMicros,
            _ => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub column_type: ColumnType,
    #[serde(default)]
    pub key: bool,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        ColumnSchema {
            name: name.into(),
            column_type,
            key: false,
        }
    }

    /// Mark this column as (part of) the primary key.
    pub fn key(mut self, key: bool) -> Self {
        self.key = key;
        self
    }
}

/// Ordered column list of a table. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
}

impl Schema {
    /// Build a schema, checking the store's creation contract: at least one
    /// column, unique names, and key columns forming a prefix.
    pub fn new(columns: Vec<ColumnSchema>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::MissingSchemaParameters(
                "schema has no columns".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(Error::DuplicateField(col.name.clone()));
            }
        }

        if !columns[0].key {
            return Err(Error::MissingSchemaParameters(format!(
                "first column '{}' must be a key column",
                columns[0].name
            )));
        }
        let key_prefix = columns.iter().take_while(|c| c.key).count();
        if columns[key_prefix..].iter().any(|c| c.key) {
            return Err(Error::MissingSchemaParameters(
                "key columns must precede all other columns".to_string(),
            ));
        }

        Ok(Schema { columns })
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in declared order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter().filter(|c| c.key)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}
