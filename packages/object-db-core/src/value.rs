//! Cell values and column type tags.

use serde::{Deserialize, Serialize};

/// Physical column types supported by the storage engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// 64-bit signed integer
    Int,
    /// Boolean
    Bool,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// UTF-8 string
    String,
    /// Raw bytes
    Binary,
    /// Timestamp in milliseconds since the Unix epoch
    Date,
    /// Single reference into another table
    Link,
    /// Ordered list of references into another table
    LinkList,
}

impl ColumnType {
    /// Returns true for column types that reference another table.
    pub fn is_link(&self) -> bool {
        matches!(self, ColumnType::Link | ColumnType::LinkList)
    }

    /// Returns the default cell value for this column type.
    pub fn default_value(&self) -> Value {
        match self {
            ColumnType::Int => Value::Int(0),
            ColumnType::Bool => Value::Bool(false),
            ColumnType::Float => Value::Float(0.0),
            ColumnType::Double => Value::Double(0.0),
            ColumnType::String => Value::String(String::new()),
            ColumnType::Binary => Value::Binary(Vec::new()),
            ColumnType::Date => Value::Date(0),
            ColumnType::Link => Value::Link(None),
            ColumnType::LinkList => Value::LinkList(Vec::new()),
        }
    }

    /// Lowercase name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Bool => "bool",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::String => "string",
            ColumnType::Binary => "binary",
            ColumnType::Date => "date",
            ColumnType::Link => "link",
            ColumnType::LinkList => "linklist",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 64-bit signed integer
    Int(i64),
    /// Boolean
    Bool(bool),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Binary(Vec<u8>),
    /// Milliseconds since the Unix epoch
    Date(i64),
    /// Row index in the target table, if set
    Link(Option<u64>),
    /// Row indexes in the target table
    LinkList(Vec<u64>),
}

impl Value {
    /// Returns the column type tag for this value.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Int(_) => ColumnType::Int,
            Value::Bool(_) => ColumnType::Bool,
            Value::Float(_) => ColumnType::Float,
            Value::Double(_) => ColumnType::Double,
            Value::String(_) => ColumnType::String,
            Value::Binary(_) => ColumnType::Binary,
            Value::Date(_) => ColumnType::Date,
            Value::Link(_) => ColumnType::Link,
            Value::LinkList(_) => ColumnType::LinkList,
        }
    }
}
