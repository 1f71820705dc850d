//! Field values and fixed-arity records.
//!
//! A [`Record`] is the generic row representation exchanged with the
//! pipeline: an ordered, fixed-arity sequence of [`Value`]s whose positions
//! line up with the column order of the table it is read from or written to.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Str(String),
    Int32(i32),
    Bool(bool),
    /// A value the pipeline produced that has no column type mapping.
    /// Carries the source-side type name.
    Unsupported(String),
}

impl Value {
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Value::Unsupported(type_name.into())
    }

    /// Runtime type name of this value.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Str(_) => "string",
            Value::Int32(_) => "int32",
            Value::Bool(_) => "bool",
            Value::Unsupported(name) => name,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Unsupported(name) => write!(f, "<{}>", name),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// Ordered, fixed-arity sequence of field values.
///
/// Arity is fixed at construction. Fields start unset and are filled
/// positionally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<Option<Value>>,
}

impl Record {
    /// Create a record with `arity` unset fields.
    pub fn new(arity: usize) -> Self {
        Record {
            fields: vec![None; arity],
        }
    }

    /// Create a fully populated record.
    pub fn from_values(values: Vec<Value>) -> Self {
        Record {
            fields: values.into_iter().map(Some).collect(),
        }
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, pos: usize) -> Option<&Value> {
        self.fields.get(pos).and_then(Option::as_ref)
    }

    pub fn set_field(&mut self, pos: usize, value: Value) -> Result<()> {
        let arity = self.fields.len();
        match self.fields.get_mut(pos) {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(Error::FieldOutOfRange {
                position: pos,
                arity,
            }),
        }
    }

    /// Iterate over fields in positional order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Value>> {
        self.fields.iter().map(Option::as_ref)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            match field {
                Some(value) => write!(f, "{} | ", value)?,
                None => f.write_str("null | ")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_unset() {
        let rec = Record::new(3);
        assert_eq!(rec.arity(), 3);
        assert!(rec.field(0).is_none());
        assert!(rec.iter().all(|f| f.is_none()));
    }

    #[test]
    fn set_field_in_range() {
        let mut rec = Record::new(2);
        rec.set_field(0, Value::from(7)).unwrap();
        rec.set_field(1, Value::from("x")).unwrap();
        assert_eq!(rec.field(0), Some(&Value::Int32(7)));
        assert_eq!(rec.field(1), Some(&Value::from("x")));
    }

    #[test]
    fn set_field_out_of_range() {
        let mut rec = Record::new(1);
        let err = rec.set_field(1, Value::from(true)).unwrap_err();
        assert!(matches!(
            err,
            Error::FieldOutOfRange {
                position: 1,
                arity: 1
            }
        ));
    }

    #[test]
    fn display_matches_row_printer() {
        let rec = Record::from_values(vec![1.into(), "alice".into(), true.into()]);
        assert_eq!(rec.to_string(), "1 | alice | true | ");
    }

    #[test]
    fn display_marks_unset_fields() {
        let mut rec = Record::new(2);
        rec.set_field(1, Value::from(false)).unwrap();
        assert_eq!(rec.to_string(), "null | false | ");
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::from("a").type_name(), "string");
        assert_eq!(Value::from(1).type_name(), "int32");
        assert_eq!(Value::from(true).type_name(), "bool");
        assert_eq!(Value::unsupported("f64").type_name(), "f64");
    }

    #[test]
    fn value_serde_is_tagged() {
        let json = serde_json::to_string(&Value::Int32(5)).unwrap();
        assert_eq!(json, r#"{"type":"int32","value":5}"#);
        let back: Value = serde_json::from_str(r#"{"type":"str","value":"bob"}"#).unwrap();
        assert_eq!(back, Value::Str("bob".into()));
    }
}
