//! Storage engine error types.

use thiserror::Error;

use crate::value::ColumnType;

/// Storage engine operation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Table not found
    #[error("Table '{table}' not found")]
    TableNotFound { table: String },

    /// Table already exists
    #[error("Table '{0}' already exists")]
    TableAlreadyExists(String),

    /// Column position out of bounds
    #[error("Column {col} out of bounds for table '{table}' ({cols} columns)")]
    ColumnOutOfBounds {
        table: String,
        col: usize,
        cols: usize,
    },

    /// Column already exists in table
    #[error("Column '{column}' already exists in table '{table}'")]
    ColumnAlreadyExists { table: String, column: String },

    /// Cell access with the wrong type
    #[error("Type mismatch in column '{column}': expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        got: ColumnType,
    },

    /// Row index out of bounds
    #[error("Row {row} out of bounds for table '{table}' ({rows} rows)")]
    RowOutOfBounds {
        table: String,
        row: usize,
        rows: usize,
    },

    /// Link operation on a non-link column
    #[error("Column '{column}' is not a link column")]
    NotALinkColumn { column: String },

    /// Link column added without a target table
    #[error("Link column '{column}' requires a target table")]
    LinkTargetRequired { column: String },
}
