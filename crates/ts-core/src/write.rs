//! Record insertion and keyed deletion.

use ts_common::{Error, Record, Result, Value};

use crate::store::{Operation, StoreSession, Table};
use crate::types::infer_type;

/// Build an insert for `record`, aligning record position `i` with column `i`.
pub fn build_insert(table: &Table, record: &Record) -> Result<Operation> {
    let columns = table.schema().columns();
    if record.arity() != columns.len() {
        return Err(Error::ArityMismatch {
            table: table.name().to_string(),
            expected: columns.len(),
            actual: record.arity(),
        });
    }

    let mut insert = table.new_insert();
    for (pos, column) in columns.iter().enumerate() {
        let value = record
            .field(pos)
            .ok_or(Error::UnsetField { position: pos })?;
        match infer_type(value) {
            Some(ty) if ty == column.column_type => {}
            Some(_) => {
                return Err(Error::TypeMismatch {
                    column: column.name.clone(),
                    expected: column.column_type.name().to_string(),
                    actual: value.type_name().to_string(),
                })
            }
            None => {
                return Err(Error::UnsupportedFieldType {
                    position: pos,
                    type_name: value.type_name().to_string(),
                })
            }
        }
        insert.row_mut().add_value(&column.name, value.clone());
    }
    Ok(insert)
}

/// Insert one record into `table`.
pub fn insert(session: &dyn StoreSession, table: &Table, record: &Record) -> Result<()> {
    let op = build_insert(table, record)?;
    session
        .apply(op)
        .map_err(|e| Error::store("insert", table.name(), e))
}

/// Delete the row whose (single-column) primary key equals `key`.
pub fn delete(session: &dyn StoreSession, table: &Table, key: &Value) -> Result<()> {
    let key_column = table.schema().columns()[0].clone();
    if infer_type(key) != Some(key_column.column_type) {
        return Err(Error::TypeMismatch {
            column: key_column.name,
            expected: key_column.column_type.name().to_string(),
            actual: key.type_name().to_string(),
        });
    }
    let mut op = table.new_delete();
    op.row_mut().add_value(&key_column.name, key.clone());
    session
        .apply(op)
        .map_err(|e| Error::store("delete", table.name(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CreateTableOptions, MemoryStore, StoreClient};
    use ts_common::{ColumnSchema, ColumnType, Schema, StoreError};

    fn users(store: &MemoryStore) -> Table {
        let schema = Schema::new(vec![
            ColumnSchema::new("id", ColumnType::Int32).key(true),
            ColumnSchema::new("name", ColumnType::String),
        ])
        .unwrap();
        store
            .create_table("users", &schema, &CreateTableOptions::new())
            .unwrap()
    }

    #[test]
    fn insert_then_delete() {
        let store = MemoryStore::new();
        let table = users(&store);
        let session = store.new_session();
        let rec = Record::from_values(vec![1.into(), "ann".into()]);
        insert(session.as_ref(), &table, &rec).unwrap();
        assert_eq!(store.row_count("users").unwrap(), 1);
        delete(session.as_ref(), &table, &Value::Int32(1)).unwrap();
        assert_eq!(store.row_count("users").unwrap(), 0);
    }

    #[test]
    fn arity_mismatch() {
        let store = MemoryStore::new();
        let table = users(&store);
        let rec = Record::from_values(vec![1.into()]);
        assert!(matches!(
            build_insert(&table, &rec),
            Err(Error::ArityMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn unset_field() {
        let store = MemoryStore::new();
        let table = users(&store);
        let mut rec = Record::new(2);
        rec.set_field(0, 1.into()).unwrap();
        assert!(matches!(
            build_insert(&table, &rec),
            Err(Error::UnsetField { position: 1 })
        ));
    }

    #[test]
    fn type_mismatch_and_unsupported() {
        let store = MemoryStore::new();
        let table = users(&store);
        let rec = Record::from_values(vec!["1".into(), "ann".into()]);
        assert!(matches!(
            build_insert(&table, &rec),
            Err(Error::TypeMismatch { ref column, .. }) if column == "id"
        ));
        let rec = Record::from_values(vec![1.into(), Value::unsupported("f64")]);
        assert!(build_insert(&table, &rec).unwrap_err().is_unsupported_type());
    }

    #[test]
    fn duplicate_insert_is_store_error() {
        let store = MemoryStore::new();
        let table = users(&store);
        let session = store.new_session();
        let rec = Record::from_values(vec![1.into(), "ann".into()]);
        insert(session.as_ref(), &table, &rec).unwrap();
        let err = insert(session.as_ref(), &table, &rec).unwrap_err();
        assert!(matches!(
            err,
            Error::Store {
                operation: "insert",
                source: StoreError::KeyAlreadyPresent(_),
                ..
            }
        ));
    }

    #[test]
    fn delete_with_wrong_key_type() {
        let store = MemoryStore::new();
        let table = users(&store);
        let session = store.new_session();
        assert!(matches!(
            delete(session.as_ref(), &table, &Value::from("1")),
            Err(Error::TypeMismatch { .. })
        ));
    }
}
