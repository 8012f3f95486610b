//! Table schema and cell storage.
//!
//! Each table has:
//! - An ordered list of typed columns
//! - One cell per column per row
//! - Optional secondary indexes per column

use crate::error::StoreError;
use crate::value::{ColumnType, Value};

use super::column::Column;

/// A columnar table: ordered typed columns plus row storage.
#[derive(Debug, Clone)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Column definitions in declaration order
    columns: Vec<Column>,
    /// Number of rows currently stored
    rows: usize,
}

impl Table {
    /// Creates an empty table with no columns and no rows.
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            columns: Vec::new(),
            rows: 0,
        }
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Returns the column at position `col`.
    pub fn column(&self, col: usize) -> Result<&Column, StoreError> {
        self.columns.get(col).ok_or(StoreError::ColumnOutOfBounds {
            table: self.name.clone(),
            col,
            cols: self.columns.len(),
        })
    }

    fn column_mut(&mut self, col: usize) -> Result<&mut Column, StoreError> {
        if col >= self.columns.len() {
            return Err(StoreError::ColumnOutOfBounds {
                table: self.name.clone(),
                col,
                cols: self.columns.len(),
            });
        }
        Ok(&mut self.columns[col])
    }

    /// Returns the name of the column at position `col`.
    pub fn column_name(&self, col: usize) -> Result<&str, StoreError> {
        Ok(&self.column(col)?.name)
    }

    /// Returns the type tag of the column at position `col`.
    pub fn column_type(&self, col: usize) -> Result<ColumnType, StoreError> {
        Ok(self.column(col)?.ty)
    }

    /// Returns the position of the column with the given name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Returns the link target table name of the column at `col`.
    ///
    /// # Returns
    /// `Err(NotALinkColumn)` for non-link columns.
    pub fn link_target(&self, col: usize) -> Result<&str, StoreError> {
        let column = self.column(col)?;
        column
            .target
            .as_deref()
            .ok_or_else(|| StoreError::NotALinkColumn {
                column: column.name.clone(),
            })
    }

    /// Adds a non-link column. Existing rows receive default cells.
    ///
    /// # Returns
    /// Position of the new column.
    pub fn add_column(&mut self, ty: ColumnType, name: &str) -> Result<usize, StoreError> {
        if ty.is_link() {
            return Err(StoreError::LinkTargetRequired {
                column: name.to_string(),
            });
        }
        self.insert_column(ty, name, None)
    }

    /// Adds a link column referencing the `target` table. Existing rows
    /// receive unset links.
    ///
    /// # Returns
    /// Position of the new column.
    pub fn add_link_column(
        &mut self,
        ty: ColumnType,
        name: &str,
        target: &str,
    ) -> Result<usize, StoreError> {
        if !ty.is_link() {
            return Err(StoreError::TypeMismatch {
                column: name.to_string(),
                expected: ColumnType::Link,
                got: ty,
            });
        }
        self.insert_column(ty, name, Some(target.to_string()))
    }

    fn insert_column(
        &mut self,
        ty: ColumnType,
        name: &str,
        target: Option<String>,
    ) -> Result<usize, StoreError> {
        if self.column_index(name).is_some() {
            return Err(StoreError::ColumnAlreadyExists {
                table: self.name.clone(),
                column: name.to_string(),
            });
        }
        self.columns
            .push(Column::new(name.to_string(), ty, target, self.rows));
        Ok(self.columns.len() - 1)
    }

    /// Appends a row of default cells.
    ///
    /// # Returns
    /// Index of the new row.
    pub fn add_empty_row(&mut self) -> usize {
        for column in &mut self.columns {
            column.push_default();
        }
        self.rows += 1;
        self.rows - 1
    }

    /// Removes the row at `row`; following rows shift down.
    pub fn remove_row(&mut self, row: usize) -> Result<(), StoreError> {
        self.check_row(row)?;
        for column in &mut self.columns {
            column.remove(row);
        }
        self.rows -= 1;
        Ok(())
    }

    fn check_row(&self, row: usize) -> Result<(), StoreError> {
        if row >= self.rows {
            return Err(StoreError::RowOutOfBounds {
                table: self.name.clone(),
                row,
                rows: self.rows,
            });
        }
        Ok(())
    }

    /// Reads the cell at (`col`, `row`).
    pub fn value(&self, col: usize, row: usize) -> Result<&Value, StoreError> {
        self.check_row(row)?;
        Ok(&self.column(col)?.cells[row])
    }

    /// Writes the cell at (`col`, `row`). The value must match the
    /// column type; no coercion is performed.
    pub fn set_value(&mut self, col: usize, row: usize, value: Value) -> Result<(), StoreError> {
        self.check_row(row)?;
        let column = self.column_mut(col)?;
        if value.column_type() != column.ty {
            return Err(StoreError::TypeMismatch {
                column: column.name.clone(),
                expected: column.ty,
                got: value.column_type(),
            });
        }
        column.set(row, value);
        Ok(())
    }

    /// Reads the integer cell at (`col`, `row`).
    pub fn get_int(&self, col: usize, row: usize) -> Result<i64, StoreError> {
        match self.value(col, row)? {
            Value::Int(v) => Ok(*v),
            other => Err(StoreError::TypeMismatch {
                column: self.column(col)?.name.clone(),
                expected: ColumnType::Int,
                got: other.column_type(),
            }),
        }
    }

    /// Writes the integer cell at (`col`, `row`).
    pub fn set_int(&mut self, col: usize, row: usize, value: i64) -> Result<(), StoreError> {
        self.set_value(col, row, Value::Int(value))
    }

    /// Reads the string cell at (`col`, `row`).
    pub fn get_string(&self, col: usize, row: usize) -> Result<&str, StoreError> {
        match self.value(col, row)? {
            Value::String(v) => Ok(v),
            other => Err(StoreError::TypeMismatch {
                column: self.column(col)?.name.clone(),
                expected: ColumnType::String,
                got: other.column_type(),
            }),
        }
    }

    /// Writes the string cell at (`col`, `row`).
    pub fn set_string(&mut self, col: usize, row: usize, value: &str) -> Result<(), StoreError> {
        self.set_value(col, row, Value::String(value.to_string()))
    }

    /// Finds the lowest row whose string cell in `col` equals `value`.
    /// Uses the secondary index when one exists.
    pub fn find_first_string(&self, col: usize, value: &str) -> Result<Option<usize>, StoreError> {
        let column = self.column(col)?;
        if column.ty != ColumnType::String {
            return Err(StoreError::TypeMismatch {
                column: column.name.clone(),
                expected: ColumnType::String,
                got: column.ty,
            });
        }
        Ok(column.find_first(&Value::String(value.to_string())))
    }

    /// Returns whether the column at `col` has a secondary index.
    pub fn has_search_index(&self, col: usize) -> Result<bool, StoreError> {
        Ok(self.column(col)?.has_search_index())
    }

    /// Creates a secondary index on the column at `col`. Idempotent.
    pub fn add_search_index(&mut self, col: usize) -> Result<(), StoreError> {
        let column = self.column_mut(col)?;
        if !column.has_search_index() {
            column.build_index();
        }
        Ok(())
    }

    /// Drops the secondary index on the column at `col`. Idempotent.
    pub fn remove_search_index(&mut self, col: usize) -> Result<(), StoreError> {
        self.column_mut(col)?.drop_index();
        Ok(())
    }

    /// Iterates columns in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }
}
