use std::fmt;

use polars::prelude::DataType;
use serde::{Deserialize, Serialize};

/// Logical type of a dataset column as recorded in the schema document.
///
/// A column whose native type has no logical counterpart is stored without a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Datetime,
    Boolean,
}

impl ColumnType {
    /// Map a polars dtype onto a logical type
    pub fn from_dtype(dtype: &DataType) -> Option<Self> {
        match dtype {
            DataType::String => Some(Self::String),
            dt if dt.is_integer() => Some(Self::Integer),
            dt if dt.is_float() => Some(Self::Float),
            DataType::Date | DataType::Datetime(_, _) => Some(Self::Datetime),
            DataType::Boolean => Some(Self::Boolean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Datetime => "datetime",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
