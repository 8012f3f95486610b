//! Group container holding every table of one store.

use indexmap::IndexMap;

use crate::error::StoreError;
use crate::table::Table;
use crate::transaction::WriteTransaction;

/// All tables of one store, in insertion order.
///
/// Iteration order is part of the contract: bulk schema introspection
/// reports tables in the order they were created.
#[derive(Debug, Clone, Default)]
pub struct Group {
    /// Map of table name to table, insertion-ordered
    tables: IndexMap<String, Table>,
}

impl Group {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table with the given name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Returns the table with the given name, mutably.
    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Returns whether a table with the given name exists.
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Adds a new empty table.
    ///
    /// # Returns
    /// `Err(TableAlreadyExists)` if the name is taken.
    pub fn add_table(&mut self, name: &str) -> Result<&mut Table, StoreError> {
        if self.tables.contains_key(name) {
            return Err(StoreError::TableAlreadyExists(name.to_string()));
        }
        tracing::debug!("Creating table '{}'", name);
        self.tables
            .insert(name.to_string(), Table::new(name.to_string()));
        Ok(self
            .tables
            .get_mut(name)
            .expect("Table was just inserted"))
    }

    /// Returns the existing table or inserts an empty one.
    ///
    /// # Returns
    /// The table and whether it was created by this call.
    pub fn get_or_insert_table(&mut self, name: &str) -> (&mut Table, bool) {
        let created = !self.tables.contains_key(name);
        if created {
            tracing::debug!("Creating table '{}'", name);
            self.tables
                .insert(name.to_string(), Table::new(name.to_string()));
        }
        let table = self
            .tables
            .get_mut(name)
            .expect("Table was just inserted");
        (table, created)
    }

    /// Returns the number of tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Iterates tables in insertion order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Iterates table names in insertion order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Begins a write transaction over this group.
    ///
    /// All mutations made through the returned handle are discarded
    /// unless the handle is committed.
    pub fn begin_write(&mut self) -> WriteTransaction<'_> {
        WriteTransaction::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_table_rejects_duplicates() {
        let mut group = Group::new();
        group.add_table("class_Person").unwrap();
        let err = group.add_table("class_Person").unwrap_err();
        assert_eq!(
            err,
            StoreError::TableAlreadyExists("class_Person".to_string())
        );
    }

    #[test]
    fn test_get_or_insert_reports_creation() {
        let mut group = Group::new();
        let (_, created) = group.get_or_insert_table("metadata");
        assert!(created);
        let (_, created) = group.get_or_insert_table("metadata");
        assert!(!created);
        assert_eq!(group.table_count(), 1);
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut group = Group::new();
        for name in ["class_B", "metadata", "class_A"] {
            group.add_table(name).unwrap();
        }
        let names: Vec<&str> = group.table_names().collect();
        assert_eq!(names, vec!["class_B", "metadata", "class_A"]);
    }
}
