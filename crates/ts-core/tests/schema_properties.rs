//! Property-based tests for schema construction and the insert/read path.

use proptest::prelude::*;
use ts_common::{Record, TableMode, Value};
use ts_core::schema::build_schema;
use ts_core::{MemoryStore, TableConnector};

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::Int32),
        "[a-zA-Z0-9 _-]{0,16}".prop_map(Value::Str),
        any::<bool>().prop_map(Value::Bool),
    ]
}

/// Unique field names paired with one sample value each.
fn fields_and_sample() -> impl Strategy<Value = (Vec<String>, Record)> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,7}", 1..8).prop_flat_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        let arity = names.len();
        prop::collection::vec(value_strategy(), arity)
            .prop_map(move |values| (names.clone(), Record::from_values(values)))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn schema_has_single_leading_key((fields, sample) in fields_and_sample()) {
        let schema = build_schema(&fields, Some(&sample)).unwrap();
        prop_assert_eq!(schema.len(), fields.len());
        let keys: Vec<_> = schema.primary_key_columns().collect();
        prop_assert_eq!(keys.len(), 1);
        prop_assert_eq!(&keys[0].name, &fields[0]);
        prop_assert!(schema.columns()[0].key);
    }

    #[test]
    fn mismatched_sample_arity_is_rejected(
        (fields, sample) in fields_and_sample(),
        extra in value_strategy(),
    ) {
        let mut values: Vec<Value> = sample.iter().flatten().cloned().collect();
        values.push(extra);
        let longer = Record::from_values(values);
        prop_assert!(build_schema(&fields, Some(&longer)).is_err());
    }

    #[test]
    fn insert_then_read_round_trips((fields, sample) in fields_and_sample()) {
        let connector = TableConnector::new(MemoryStore::new());
        let table = connector
            .use_table("t", &fields, Some(&sample), TableMode::Create)
            .unwrap();
        connector.insert(&table, &sample).unwrap();
        let rows = connector.read_table("t").unwrap();
        prop_assert_eq!(rows, vec![sample]);
    }

    #[test]
    fn distinct_keys_read_back_in_key_order(keys in prop::collection::btree_set(any::<i32>(), 0..40)) {
        let fields = vec!["id".to_string(), "label".to_string()];
        let sample = Record::from_values(vec![0.into(), "x".into()]);
        let connector = TableConnector::new(MemoryStore::new().with_scan_batch_size(3));
        let table = connector
            .use_table("t", &fields, Some(&sample), TableMode::Create)
            .unwrap();
        // Insert in reverse so scan order cannot be insertion order by accident.
        for key in keys.iter().rev() {
            let rec = Record::from_values(vec![(*key).into(), format!("k{key}").into()]);
            connector.insert(&table, &rec).unwrap();
        }
        let read: Vec<i32> = connector
            .read_table("t")
            .unwrap()
            .iter()
            .filter_map(|r| r.field(0).and_then(Value::as_i32))
            .collect();
        prop_assert_eq!(read, keys.into_iter().collect::<Vec<_>>());
    }
}
