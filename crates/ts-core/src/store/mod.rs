//! Store client seam.
//!
//! The connector core never talks to the network itself. Everything it needs
//! from the remote table store goes through [`StoreClient`], [`ScanCursor`]
//! and [`StoreSession`]. All calls are blocking.

pub mod memory;

use std::sync::Arc;
use ts_common::{ColumnType, Schema, StoreError, Value};

pub use memory::MemoryStore;

/// Options passed to [`StoreClient::create_table`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTableOptions {
    pub range_partition_columns: Vec<String>,
    pub num_replicas: Option<u32>,
}

impl CreateTableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_range_partition_columns(mut self, columns: Vec<String>) -> Self {
        self.range_partition_columns = columns;
        self
    }

    pub fn set_num_replicas(mut self, replicas: u32) -> Self {
        self.num_replicas = Some(replicas);
        self
    }
}

/// Handle to a named, schema-bound remote table.
///
/// The schema is fixed at creation and shared by every handle to the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    id: String,
    name: String,
    schema: Arc<Schema>,
}

impl Table {
    pub fn new(id: impl Into<String>, name: impl Into<String>, schema: Arc<Schema>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            schema,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn new_insert(&self) -> Operation {
        Operation::new(OperationKind::Insert, &self.name)
    }

    pub fn new_delete(&self) -> Operation {
        Operation::new(OperationKind::Delete, &self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Insert,
    Delete,
}

/// A single-row mutation bound to a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    kind: OperationKind,
    table: String,
    row: PartialRow,
}

impl Operation {
    fn new(kind: OperationKind, table: &str) -> Self {
        Self {
            kind,
            table: table.to_string(),
            row: PartialRow::default(),
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn row(&self) -> &PartialRow {
        &self.row
    }

    pub fn row_mut(&mut self) -> &mut PartialRow {
        &mut self.row
    }
}

/// Column cells set on an operation, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialRow {
    cells: Vec<(String, Value)>,
}

impl PartialRow {
    pub fn add_string(&mut self, column: &str, value: impl Into<String>) {
        self.add_value(column, Value::Str(value.into()));
    }

    pub fn add_int(&mut self, column: &str, value: i32) {
        self.add_value(column, Value::Int32(value));
    }

    pub fn add_bool(&mut self, column: &str, value: bool) {
        self.add_value(column, Value::Bool(value));
    }

    /// Set a cell, replacing any earlier value for the same column.
    pub fn add_value(&mut self, column: &str, value: Value) {
        match self.cells.iter_mut().find(|(name, _)| name == column) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((column.to_string(), value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    pub fn cells(&self) -> &[(String, Value)] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// One row returned by a scan, readable by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct RowResult {
    schema: Arc<Schema>,
    cells: Vec<Value>,
}

impl RowResult {
    pub fn new(schema: Arc<Schema>, cells: Vec<Value>) -> Self {
        Self { schema, cells }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn column_type(&self, column: &str) -> Result<ColumnType, StoreError> {
        self.schema
            .column(column)
            .map(|c| c.column_type)
            .ok_or_else(|| StoreError::ColumnNotFound(column.to_string()))
    }

    fn cell(&self, column: &str) -> Result<&Value, StoreError> {
        self.schema
            .column_index(column)
            .and_then(|idx| self.cells.get(idx))
            .ok_or_else(|| StoreError::ColumnNotFound(column.to_string()))
    }

    fn mismatch(&self, column: &str, requested: ColumnType) -> StoreError {
        StoreError::TypeMismatch {
            column: column.to_string(),
            actual: self
                .column_type(column)
                .map(|t| t.name().to_string())
                .unwrap_or_else(|_| "unknown".to_string()),
            requested: requested.name().to_string(),
        }
    }

    pub fn get_string(&self, column: &str) -> Result<String, StoreError> {
        self.cell(column)?
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| self.mismatch(column, ColumnType::String))
    }

    pub fn get_int(&self, column: &str) -> Result<i32, StoreError> {
        self.cell(column)?
            .as_i32()
            .ok_or_else(|| self.mismatch(column, ColumnType::Int32))
    }

    pub fn get_bool(&self, column: &str) -> Result<bool, StoreError> {
        self.cell(column)?
            .as_bool()
            .ok_or_else(|| self.mismatch(column, ColumnType::Bool))
    }
}

/// Cursor over the rows of one table, yielded in batches.
pub trait ScanCursor {
    fn has_more_rows(&self) -> bool;
    fn next_batch(&mut self) -> Result<Vec<RowResult>, StoreError>;
}

/// Applies mutations. May batch internally; `flush` forces pending work out.
pub trait StoreSession {
    fn apply(&self, operation: Operation) -> Result<(), StoreError>;
    fn flush(&self) -> Result<(), StoreError>;
}

/// Table lifecycle and scan access to the remote store.
pub trait StoreClient {
    fn table_exists(&self, name: &str) -> Result<bool, StoreError>;
    fn create_table(
        &self,
        name: &str,
        schema: &Schema,
        options: &CreateTableOptions,
    ) -> Result<Table, StoreError>;
    fn open_table(&self, name: &str) -> Result<Table, StoreError>;
    fn delete_table(&self, name: &str) -> Result<(), StoreError>;
    fn list_tables(&self) -> Result<Vec<String>, StoreError>;
    fn new_scanner(&self, table: &Table) -> Result<Box<dyn ScanCursor>, StoreError>;
    fn new_session(&self) -> Box<dyn StoreSession>;
}
