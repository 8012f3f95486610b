//! Scoped write transactions with abort-on-drop.

use crate::group::Group;

/// RAII guard for a write transaction over a group.
///
/// A snapshot of the group is taken when the transaction begins. If
/// the guard is dropped without an explicit commit, the snapshot is
/// restored and every mutation made through the guard is discarded.
#[derive(Debug)]
pub struct WriteTransaction<'g> {
    /// The group under transaction
    group: &'g mut Group,
    /// Begin-time snapshot; taken by commit
    snapshot: Option<Group>,
}

impl<'g> WriteTransaction<'g> {
    pub(crate) fn new(group: &'g mut Group) -> Self {
        let snapshot = group.clone();
        Self {
            group,
            snapshot: Some(snapshot),
        }
    }

    /// Read access to the group under transaction.
    pub fn group(&self) -> &Group {
        self.group
    }

    /// Write access to the group under transaction.
    pub fn group_mut(&mut self) -> &mut Group {
        self.group
    }

    /// Commits the transaction, keeping all mutations.
    pub fn commit(mut self) {
        self.snapshot = None;
        tracing::debug!("Write transaction committed");
    }

    /// Aborts the transaction, restoring the begin-time snapshot.
    pub fn abort(self) {
        // Drop restores the snapshot.
    }
}

impl Drop for WriteTransaction<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            tracing::debug!("Write transaction aborted, restoring snapshot");
            *self.group = snapshot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ColumnType;
    use ntest::timeout;

    #[timeout(1000)]
    #[test]
    fn test_commit_keeps_mutations() {
        let mut group = Group::new();

        let mut txn = group.begin_write();
        let table = txn.group_mut().add_table("class_Person").unwrap();
        table.add_column(ColumnType::String, "name").unwrap();
        txn.commit();

        assert!(group.has_table("class_Person"));
    }

    #[timeout(1000)]
    #[test]
    fn test_drop_without_commit_rolls_back() {
        let mut group = Group::new();
        group.add_table("metadata").unwrap();

        {
            let mut txn = group.begin_write();
            txn.group_mut().add_table("class_Person").unwrap();
            // dropped without commit
        }

        assert!(!group.has_table("class_Person"));
        assert!(group.has_table("metadata"));
    }

    #[timeout(1000)]
    #[test]
    fn test_abort_restores_cell_writes() {
        let mut group = Group::new();
        let table = group.add_table("metadata").unwrap();
        let col = table.add_column(ColumnType::Int, "version").unwrap();
        let row = table.add_empty_row();
        table.set_int(col, row, 1).unwrap();

        let mut txn = group.begin_write();
        txn.group_mut()
            .table_mut("metadata")
            .unwrap()
            .set_int(col, row, 2)
            .unwrap();
        txn.abort();

        assert_eq!(group.table("metadata").unwrap().get_int(col, row).unwrap(), 1);
    }
}
