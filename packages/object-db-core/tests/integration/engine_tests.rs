//! End-to-end checks of group, table, and transaction behavior.

use object_db_core::{ColumnType, Group, StoreError, Value};

#[test]
fn table_lifecycle_through_transaction() -> anyhow::Result<()> {
    let mut group = Group::new();

    let mut txn = group.begin_write();
    {
        let grp = txn.group_mut();
        let table = grp.add_table("class_Person")?;
        table.add_column(ColumnType::String, "name")?;
        table.add_column(ColumnType::Int, "age")?;
        let row = table.add_empty_row();
        table.set_string(0, row, "alice")?;
        table.set_int(1, row, 30)?;
    }
    txn.commit();

    let table = group.table("class_Person").expect("table exists");
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.get_string(0, 0)?, "alice");
    assert_eq!(table.get_int(1, 0)?, 30);
    Ok(())
}

#[test]
fn rollback_discards_new_columns_and_rows() -> anyhow::Result<()> {
    let mut group = Group::new();
    {
        let mut txn = group.begin_write();
        let table = txn.group_mut().add_table("class_Person")?;
        table.add_column(ColumnType::String, "name")?;
        txn.commit();
    }

    {
        let mut txn = group.begin_write();
        let table = txn.group_mut().table_mut("class_Person").unwrap();
        table.add_column(ColumnType::Int, "age")?;
        table.add_empty_row();
        // dropped without commit
    }

    let table = group.table("class_Person").unwrap();
    assert_eq!(table.column_count(), 1);
    assert_eq!(table.row_count(), 0);
    Ok(())
}

#[test]
fn link_columns_resolve_targets() -> anyhow::Result<()> {
    let mut group = Group::new();
    group.add_table("class_Dog")?;
    let table = group.add_table("class_Person")?;
    table.add_column(ColumnType::String, "name")?;
    let col = table.add_link_column(ColumnType::Link, "dog", "class_Dog")?;

    assert_eq!(table.link_target(col)?, "class_Dog");
    assert_eq!(table.column_type(col)?, ColumnType::Link);

    let row = table.add_empty_row();
    assert_eq!(table.value(col, row)?, &Value::Link(None));
    table.set_value(col, row, Value::Link(Some(0)))?;
    assert_eq!(table.value(col, row)?, &Value::Link(Some(0)));
    Ok(())
}

#[test]
fn typed_access_rejects_wrong_kind() {
    let mut group = Group::new();
    let table = group.add_table("class_Person").unwrap();
    table.add_column(ColumnType::String, "name").unwrap();
    let row = table.add_empty_row();

    let err = table.set_value(0, row, Value::Int(1)).unwrap_err();
    assert!(matches!(err, StoreError::TypeMismatch { .. }));
}
