//! Table open modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How a caller intends to use a target table.
///
/// Each mode is a mutually exclusive precondition contract on whether the
/// table may or must already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableMode {
    /// Table must not exist; it is created from the field list and a sample record.
    Create,
    /// Table must exist; rows are added to it.
    Append,
    /// Table must exist; all rows are removed before it is handed out.
    Override,
}

impl TableMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableMode::Create => "CREATE",
            TableMode::Append => "APPEND",
            TableMode::Override => "OVERRIDE",
        }
    }
}

impl fmt::Display for TableMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREATE" => Ok(TableMode::Create),
            "APPEND" => Ok(TableMode::Append),
            "OVERRIDE" => Ok(TableMode::Override),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}
