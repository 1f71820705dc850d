//! In-process store backend.
//!
//! Behaves like a columnar table store for everything the connector relies
//! on: rows are ordered by primary key (the default scan order), scans come
//! back in batches, inserting a present key and deleting an absent key are
//! rejected. Cells of column types without a [`Value`] mapping are stored as
//! `Value::Unsupported(<type name>)`.
//!
//! Clones share the same tables.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use ts_common::{ColumnType, Schema, StoreError, Value};

use super::{
    CreateTableOptions, Operation, OperationKind, RowResult, ScanCursor, StoreClient,
    StoreSession, Table,
};

/// Default number of rows per scan batch.
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 64;

#[derive(Debug)]
struct MemTable {
    id: String,
    schema: Arc<Schema>,
    rows: BTreeMap<Vec<Value>, Vec<Value>>,
}

#[derive(Debug)]
struct Inner {
    tables: BTreeMap<String, MemTable>,
    next_id: u64,
    scan_batch_size: usize,
    failing_deletes: HashSet<Value>,
    fail_next_flush: bool,
    create_calls: usize,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            tables: BTreeMap::new(),
            next_id: 1,
            scan_batch_size: DEFAULT_SCAN_BATCH_SIZE,
            failing_deletes: HashSet::new(),
            fail_next_flush: false,
            create_calls: 0,
        }
    }
}

/// Shared in-memory table store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of rows returned per scan batch (minimum 1).
    pub fn with_scan_batch_size(self, size: usize) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.scan_batch_size = size.max(1);
        }
        self
    }

    /// Make every delete whose first key cell equals `key` fail.
    pub fn fail_delete_of(&self, key: Value) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failing_deletes.insert(key);
        }
    }

    /// Make the next session flush fail.
    pub fn fail_next_flush(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_next_flush = true;
        }
    }

    /// Number of `create_table` calls received, successful or not.
    pub fn create_calls(&self) -> usize {
        self.inner.lock().map(|i| i.create_calls).unwrap_or(0)
    }

    /// Row count of a table.
    pub fn row_count(&self, name: &str) -> Result<usize, StoreError> {
        let inner = self.lock()?;
        inner
            .tables
            .get(name)
            .map(|t| t.rows.len())
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))
    }

    fn apply(&self, operation: &Operation) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let is_delete = operation.kind() == OperationKind::Delete;
        let table = inner
            .tables
            .get(operation.table_name())
            .ok_or_else(|| StoreError::TableNotFound(operation.table_name().to_string()))?;
        let key = key_of(&table.schema, operation)?;

        if is_delete
            && key
                .first()
                .is_some_and(|k| inner.failing_deletes.contains(k))
        {
            return Err(StoreError::Unavailable(format!(
                "injected delete failure for key {}",
                render_key(&key)
            )));
        }

        let table = inner
            .tables
            .get_mut(operation.table_name())
            .ok_or_else(|| StoreError::TableNotFound(operation.table_name().to_string()))?;

        match operation.kind() {
            OperationKind::Insert => {
                if table.rows.contains_key(&key) {
                    return Err(StoreError::KeyAlreadyPresent(render_key(&key)));
                }
                let row = full_row(&table.schema, operation)?;
                table.rows.insert(key, row);
            }
            OperationKind::Delete => {
                if table.rows.remove(&key).is_none() {
                    return Err(StoreError::KeyNotFound(render_key(&key)));
                }
            }
        }
        Ok(())
    }
}

fn render_key(key: &[Value]) -> String {
    key.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn cell_matches(column_type: ColumnType, value: &Value) -> bool {
    match (column_type, value) {
        (ColumnType::String, Value::Str(_)) => true,
        (ColumnType::Int32, Value::Int32(_)) => true,
        (ColumnType::Bool, Value::Bool(_)) => true,
        (ty, Value::Unsupported(name)) => ty.name() == name,
        _ => false,
    }
}

fn checked_cell(schema: &Schema, operation: &Operation, column: &str) -> Result<Value, StoreError> {
    let col = schema
        .column(column)
        .ok_or_else(|| StoreError::ColumnNotFound(column.to_string()))?;
    let value = operation
        .row()
        .get(column)
        .ok_or_else(|| StoreError::ColumnNotFound(column.to_string()))?;
    if !cell_matches(col.column_type, value) {
        return Err(StoreError::TypeMismatch {
            column: column.to_string(),
            actual: col.column_type.name().to_string(),
            requested: value.type_name().to_string(),
        });
    }
    Ok(value.clone())
}

fn key_of(schema: &Schema, operation: &Operation) -> Result<Vec<Value>, StoreError> {
    schema
        .primary_key_columns()
        .map(|col| checked_cell(schema, operation, &col.name))
        .collect()
}

fn full_row(schema: &Schema, operation: &Operation) -> Result<Vec<Value>, StoreError> {
    for (name, _) in operation.row().cells() {
        if schema.column(name).is_none() {
            return Err(StoreError::ColumnNotFound(name.clone()));
        }
    }
    schema
        .columns()
        .iter()
        .map(|col| checked_cell(schema, operation, &col.name))
        .collect()
}

impl StoreClient for MemoryStore {
    fn table_exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.tables.contains_key(name))
    }

    fn create_table(
        &self,
        name: &str,
        schema: &Schema,
        options: &CreateTableOptions,
    ) -> Result<Table, StoreError> {
        let mut inner = self.lock()?;
        inner.create_calls += 1;

        if inner.tables.contains_key(name) {
            return Err(StoreError::TableAlreadyExists(name.to_string()));
        }
        for column in &options.range_partition_columns {
            match schema.column(column) {
                Some(col) if col.key => {}
                Some(_) => {
                    return Err(StoreError::InvalidSchema(format!(
                        "range partition column '{}' is not a key column",
                        column
                    )))
                }
                None => return Err(StoreError::ColumnNotFound(column.clone())),
            }
        }
        if options.num_replicas == Some(0) {
            return Err(StoreError::InvalidSchema(
                "replication factor must be at least 1".to_string(),
            ));
        }

        let id = format!("{:016x}", inner.next_id);
        inner.next_id += 1;
        let schema = Arc::new(schema.clone());
        inner.tables.insert(
            name.to_string(),
            MemTable {
                id: id.clone(),
                schema: Arc::clone(&schema),
                rows: BTreeMap::new(),
            },
        );
        Ok(Table::new(id, name, schema))
    }

    fn open_table(&self, name: &str) -> Result<Table, StoreError> {
        let inner = self.lock()?;
        let table = inner
            .tables
            .get(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))?;
        Ok(Table::new(
            table.id.clone(),
            name,
            Arc::clone(&table.schema),
        ))
    }

    fn delete_table(&self, name: &str) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner
            .tables
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }

    fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.tables.keys().cloned().collect())
    }

    fn new_scanner(&self, table: &Table) -> Result<Box<dyn ScanCursor>, StoreError> {
        let inner = self.lock()?;
        let stored = inner
            .tables
            .get(table.name())
            .filter(|t| t.id == table.id())
            .ok_or_else(|| StoreError::TableNotFound(table.name().to_string()))?;
        Ok(Box::new(MemoryScanner {
            schema: Arc::clone(&stored.schema),
            rows: stored.rows.values().cloned().collect(),
            batch_size: inner.scan_batch_size,
        }))
    }

    fn new_session(&self) -> Box<dyn StoreSession> {
        Box::new(MemorySession {
            store: self.clone(),
        })
    }
}

/// Snapshot scanner: rows are captured when the scanner is opened.
struct MemoryScanner {
    schema: Arc<Schema>,
    rows: VecDeque<Vec<Value>>,
    batch_size: usize,
}

impl ScanCursor for MemoryScanner {
    fn has_more_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    fn next_batch(&mut self) -> Result<Vec<RowResult>, StoreError> {
        let n = self.batch_size.min(self.rows.len());
        Ok(self
            .rows
            .drain(..n)
            .map(|cells| RowResult::new(Arc::clone(&self.schema), cells))
            .collect())
    }
}

/// Session that applies each operation synchronously.
struct MemorySession {
    store: MemoryStore,
}

impl StoreSession for MemorySession {
    fn apply(&self, operation: Operation) -> Result<(), StoreError> {
        self.store.apply(&operation)
    }

    fn flush(&self) -> Result<(), StoreError> {
        let mut inner = self.store.lock()?;
        if std::mem::take(&mut inner.fail_next_flush) {
            return Err(StoreError::Unavailable("injected flush failure".to_string()));
        }
        Ok(())
    }
}
