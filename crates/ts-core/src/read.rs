//! Full-table reads into records.

use tracing::{debug, trace};
use ts_common::{Error, Record, Result};

use crate::resolve::open_table;
use crate::store::{StoreClient, Table};
use crate::types::{cell_reader, CellReader};

/// Read every row of `table` into records in the store's default scan order.
///
/// Record position `i` holds column `i` of the table schema. A column whose
/// type has no mapping fails the read before any row is scanned, so records
/// always have exactly one value per column.
pub fn read_all(client: &dyn StoreClient, table: &Table) -> Result<Vec<Record>> {
    let name = table.name();
    let readers: Vec<(&str, CellReader)> = table
        .schema()
        .columns()
        .iter()
        .map(|col| Ok((col.name.as_str(), cell_reader(&col.name, col.column_type.name())?)))
        .collect::<Result<_>>()?;

    let mut scanner = client
        .new_scanner(table)
        .map_err(|e| Error::store("scan", name, e))?;

    let mut records = Vec::new();
    while scanner.has_more_rows() {
        let batch = scanner
            .next_batch()
            .map_err(|e| Error::store("scan", name, e))?;
        for row in &batch {
            let mut record = Record::new(readers.len());
            for (pos, &(column, read)) in readers.iter().enumerate() {
                let value = read(row, column).map_err(|e| Error::store("scan", name, e))?;
                record.set_field(pos, value)?;
            }
            trace!(table = name, row = %record, "row read");
            records.push(record);
        }
    }

    debug!(table = name, rows = records.len(), "table read");
    Ok(records)
}

/// Open `name` and read all of its rows.
pub fn read_table(client: &dyn StoreClient, name: &str) -> Result<Vec<Record>> {
    let table = open_table(client, name)?;
    read_all(client, &table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CreateTableOptions, MemoryStore};
    use std::sync::{Arc, Mutex};
    use ts_common::{ColumnSchema, ColumnType, Schema, Value};

    fn users(store: &MemoryStore) -> Table {
        let schema = Schema::new(vec![
            ColumnSchema::new("id", ColumnType::Int32).key(true),
            ColumnSchema::new("name", ColumnType::String),
            ColumnSchema::new("active", ColumnType::Bool),
        ])
        .unwrap();
        store
            .create_table("users", &schema, &CreateTableOptions::new())
            .unwrap()
    }

    fn insert(store: &MemoryStore, table: &Table, id: i32, name: &str, active: bool) {
        let mut op = table.new_insert();
        op.row_mut().add_int("id", id);
        op.row_mut().add_string("name", name);
        op.row_mut().add_bool("active", active);
        store.new_session().apply(op).unwrap();
    }

    #[test]
    fn empty_table_reads_nothing() {
        let store = MemoryStore::new();
        let table = users(&store);
        assert!(read_all(&store, &table).unwrap().is_empty());
    }

    #[test]
    fn reads_rows_across_batches_in_column_order() {
        let store = MemoryStore::new().with_scan_batch_size(2);
        let table = users(&store);
        for id in 0..5 {
            insert(&store, &table, id, &format!("user{id}"), id % 2 == 0);
        }

        let records = read_all(&store, &table).unwrap();
        assert_eq!(records.len(), 5);
        for (id, rec) in records.iter().enumerate() {
            let id = id as i32;
            assert_eq!(rec.arity(), 3);
            assert_eq!(rec.field(0), Some(&Value::Int32(id)));
            assert_eq!(rec.field(1), Some(&Value::Str(format!("user{id}"))));
            assert_eq!(rec.field(2), Some(&Value::Bool(id % 2 == 0)));
        }
    }

    #[test]
    fn unsupported_column_rejected_not_skipped() {
        let store = MemoryStore::new();
        let schema = Schema::new(vec![
            ColumnSchema::new("id", ColumnType::Int32).key(true),
            ColumnSchema::new("price", ColumnType::Double),
            ColumnSchema::new("name", ColumnType::String),
        ])
        .unwrap();
        let table = store
            .create_table("prices", &schema, &CreateTableOptions::new())
            .unwrap();
        let mut op = table.new_insert();
        op.row_mut().add_int("id", 1);
        op.row_mut().add_value("price", Value::unsupported("double"));
        op.row_mut().add_string("name", "widget");
        store.new_session().apply(op).unwrap();

        let err = read_all(&store, &table).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedColumnType { ref column, ref type_name }
                if column == "price" && type_name == "double"
        ));
    }

    #[test]
    fn read_table_missing_is_store_error() {
        let store = MemoryStore::new();
        let err = read_table(&store, "ghost").unwrap_err();
        assert!(matches!(err, Error::Store { operation: "open_table", .. }));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn each_row_is_traced() {
        let store = MemoryStore::new();
        let table = users(&store);
        insert(&store, &table, 1, "alice", true);
        insert(&store, &table, 2, "bob", false);

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            read_all(&store, &table).unwrap();
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("1 | alice | true | "), "{output}");
        assert!(output.contains("2 | bob | false | "), "{output}");
    }
}
