//! Schema reconciliation and migration orchestration.
//!
//! Stateless functions over a group or write transaction: version
//! bookkeeping, the primary-key registry, table/column reconciliation,
//! and the top-level migration protocol. Mutating entry points take
//! the caller's [`WriteTransaction`]; read-only ones take `&Group` and
//! never mutate physical state.

use std::collections::HashSet;

use object_db_core::{ColumnType, Group, StoreError, Table, WriteTransaction};

use crate::error::SchemaError;
use crate::object_schema::ObjectSchema;

/// Schema version of stores that have never been versioned.
pub const NOT_VERSIONED: u64 = u64::MAX;

const METADATA_TABLE_NAME: &str = "metadata";
const VERSION_COLUMN_NAME: &str = "version";
const VERSION_COLUMN: usize = 0;
const VERSION_ROW: usize = 0;

const PK_TABLE_NAME: &str = "pk";
const PK_TYPE_COLUMN_NAME: &str = "pk_type";
const PK_TYPE_COLUMN: usize = 0;
const PK_PROPERTY_COLUMN_NAME: &str = "pk_property";
const PK_PROPERTY_COLUMN: usize = 1;

const TYPE_TABLE_PREFIX: &str = "class_";

/// Translates a logical type name into its physical table name.
pub(crate) fn table_name_for_object_type(object_type: &str) -> String {
    format!("{TYPE_TABLE_PREFIX}{object_type}")
}

/// Translates a physical table name back into a logical type name.
///
/// # Returns
/// `None` for tables outside the naming convention (metadata and
/// system tables).
pub(crate) fn object_type_for_table_name(table_name: &str) -> Option<&str> {
    table_name.strip_prefix(TYPE_TABLE_PREFIX)
}

/// Returns the physical table backing a logical type, if present.
pub fn table_for_object_type<'g>(group: &'g Group, object_type: &str) -> Option<&'g Table> {
    group.table(&table_name_for_object_type(object_type))
}

/// Returns whether both metadata tables exist.
pub fn has_metadata_tables(group: &Group) -> bool {
    group.has_table(PK_TABLE_NAME) && group.has_table(METADATA_TABLE_NAME)
}

/// Creates any metadata tables that don't already exist. A freshly
/// created version table starts at the [`NOT_VERSIONED`] sentinel.
///
/// # Returns
/// Whether anything was created.
pub fn create_metadata_tables(txn: &mut WriteTransaction<'_>) -> Result<bool, SchemaError> {
    let mut changed = false;
    let group = txn.group_mut();

    let (pk, _) = group.get_or_insert_table(PK_TABLE_NAME);
    if pk.column_count() == 0 {
        pk.add_column(ColumnType::String, PK_TYPE_COLUMN_NAME)?;
        pk.add_column(ColumnType::String, PK_PROPERTY_COLUMN_NAME)?;
        changed = true;
    }

    let (metadata, _) = group.get_or_insert_table(METADATA_TABLE_NAME);
    if metadata.column_count() == 0 {
        metadata.add_column(ColumnType::Int, VERSION_COLUMN_NAME)?;
        let row = metadata.add_empty_row();
        metadata.set_int(VERSION_COLUMN, row, NOT_VERSIONED as i64)?;
        changed = true;
    }

    Ok(changed)
}

/// Reads the stored schema version. Read-only.
///
/// # Returns
/// [`NOT_VERSIONED`] when no version has ever been persisted.
pub fn get_schema_version(group: &Group) -> u64 {
    let table = match group.table(METADATA_TABLE_NAME) {
        Some(table) => table,
        None => return NOT_VERSIONED,
    };
    if table.column_count() == 0 || table.row_count() == 0 {
        return NOT_VERSIONED;
    }
    match table.get_int(VERSION_COLUMN, VERSION_ROW) {
        Ok(version) => version as u64,
        Err(_) => NOT_VERSIONED,
    }
}

/// Persists a new schema version.
fn set_schema_version(txn: &mut WriteTransaction<'_>, version: u64) -> Result<(), SchemaError> {
    let group = txn.group_mut();
    let (metadata, _) = group.get_or_insert_table(METADATA_TABLE_NAME);
    if metadata.column_count() == 0 {
        metadata.add_column(ColumnType::Int, VERSION_COLUMN_NAME)?;
        metadata.add_empty_row();
    }
    metadata.set_int(VERSION_COLUMN, VERSION_ROW, version as i64)?;
    tracing::debug!("Schema version set to {}", version);
    Ok(())
}

/// Returns the primary-key property name registered for a type.
/// Read-only.
pub fn get_primary_key_for_object(group: &Group, object_type: &str) -> Option<String> {
    let table = group.table(PK_TABLE_NAME)?;
    let row = match table.find_first_string(PK_TYPE_COLUMN, object_type) {
        Ok(Some(row)) => row,
        _ => return None,
    };
    match table.get_string(PK_PROPERTY_COLUMN, row) {
        Ok(name) if !name.is_empty() => Some(name.to_string()),
        _ => None,
    }
}

/// Registers, updates, or removes the primary-key property for a type.
/// Passing `None` removes the registry entry.
pub fn set_primary_key_for_object(
    txn: &mut WriteTransaction<'_>,
    object_type: &str,
    primary_key: Option<&str>,
) -> Result<(), SchemaError> {
    let table = txn
        .group_mut()
        .table_mut(PK_TABLE_NAME)
        .ok_or_else(|| StoreError::TableNotFound {
            table: PK_TABLE_NAME.to_string(),
        })?;

    let row = table.find_first_string(PK_TYPE_COLUMN, object_type)?;
    match (row, primary_key) {
        (Some(row), None) => {
            table.remove_row(row)?;
        }
        (Some(row), Some(primary_key)) => {
            table.set_string(PK_PROPERTY_COLUMN, row, primary_key)?;
        }
        (None, Some(primary_key)) => {
            let row = table.add_empty_row();
            table.set_string(PK_TYPE_COLUMN, row, object_type)?;
            table.set_string(PK_PROPERTY_COLUMN, row, primary_key)?;
        }
        (None, None) => {}
    }
    Ok(())
}

/// Checks whether updating to `new_version` requires a migration.
///
/// # Returns
/// - `Ok(true)` when the store is unversioned or older than
///   `new_version`
/// - `Ok(false)` when the stored version equals `new_version`
/// - `Err(VersionOrder)` when the stored version is newer; a downgrade
///   is never attempted automatically
pub fn is_migration_required(group: &Group, new_version: u64) -> Result<bool, SchemaError> {
    let stored = get_schema_version(group);
    if stored == NOT_VERSIONED {
        return Ok(true);
    }
    if stored > new_version {
        return Err(SchemaError::VersionOrder {
            stored,
            requested: new_version,
        });
    }
    Ok(stored < new_version)
}

/// Verifies one target object schema against its physical table,
/// recording the physical column position on each matching property.
///
/// Index-flag differences are not validation errors; index sync
/// belongs to table reconciliation. Physical type and link structure
/// are never mutated here.
///
/// # Returns
/// Accumulated error strings; an empty list means the type is fully
/// satisfiable against the current physical table.
pub fn validate_schema_and_update_column_mapping(
    group: &Group,
    target_schema: &mut ObjectSchema,
) -> Result<Vec<String>, SchemaError> {
    let table = table_for_object_type(group, &target_schema.name).ok_or_else(|| {
        StoreError::TableNotFound {
            table: table_name_for_object_type(&target_schema.name),
        }
    })?;

    let mut errors = Vec::new();
    for property in &mut target_schema.properties {
        let col = match table.column_index(&property.name) {
            Some(col) => col,
            None => {
                errors.push(format!("Missing property '{}'", property.name));
                continue;
            }
        };

        let column_type = table.column_type(col)?;
        let expected = ColumnType::from(property.ty);
        if column_type != expected {
            errors.push(format!(
                "Property '{}' has incorrect type {} (expected {})",
                property.name, column_type, expected
            ));
            continue;
        }

        if property.ty.is_link() {
            let target_type =
                object_type_for_table_name(table.link_target(col)?).unwrap_or_default();
            if Some(target_type) != property.object_type.as_deref() {
                errors.push(format!(
                    "Property '{}' links to type '{}' (expected '{}')",
                    property.name,
                    target_type,
                    property.object_type.as_deref().unwrap_or_default()
                ));
                continue;
            }
        }

        property.table_column = Some(col);
    }

    if let Some(primary_key) = target_schema.primary_key.clone() {
        if target_schema.property_for_name(&primary_key).is_none() {
            errors.push(format!("No property matching primary key '{primary_key}'"));
        }
    }

    Ok(errors)
}

/// Ensures a physical table exists for every descriptor in the target
/// schema (creation always counts as a change) and, for created tables
/// or when `update_existing` is set, adds missing columns and syncs
/// secondary indexes to each property's `is_indexed` flag. Existing
/// columns of a different type are left untouched; validation reports
/// them. Resolvable properties get their `table_column` repopulated.
///
/// # Returns
/// Whether any physical mutation occurred.
pub fn create_tables(
    txn: &mut WriteTransaction<'_>,
    target_schema: &mut [ObjectSchema],
    update_existing: bool,
) -> Result<bool, SchemaError> {
    let mut changed = false;
    let group = txn.group_mut();

    // First ensure every class table exists, including link targets
    // that lie outside the target schema, so link columns always have
    // a resolvable table.
    let mut created_types: HashSet<String> = HashSet::new();
    for object_schema in target_schema.iter() {
        let (_, created) =
            group.get_or_insert_table(&table_name_for_object_type(&object_schema.name));
        if created {
            created_types.insert(object_schema.name.clone());
            changed = true;
        }
    }
    for object_schema in target_schema.iter() {
        for property in &object_schema.properties {
            if let Some(object_type) = &property.object_type {
                let (_, created) =
                    group.get_or_insert_table(&table_name_for_object_type(object_type));
                if created {
                    created_types.insert(object_type.clone());
                    changed = true;
                }
            }
        }
    }

    // Then reconcile columns and indexes per type.
    for object_schema in target_schema.iter_mut() {
        let created = created_types.contains(&object_schema.name);
        let table_name = table_name_for_object_type(&object_schema.name);
        let table = group
            .table_mut(&table_name)
            .expect("Class table was just ensured");

        for property in &mut object_schema.properties {
            let col = match table.column_index(&property.name) {
                Some(col) => col,
                None if created || update_existing => {
                    let ty = ColumnType::from(property.ty);
                    let col = match &property.object_type {
                        Some(object_type) => table.add_link_column(
                            ty,
                            &property.name,
                            &table_name_for_object_type(object_type),
                        )?,
                        None => table.add_column(ty, &property.name)?,
                    };
                    tracing::debug!("Added column '{}' to table '{}'", property.name, table_name);
                    changed = true;
                    col
                }
                // Validation reports the missing column.
                None => continue,
            };
            property.table_column = Some(col);

            if created || update_existing {
                let has_index = table.has_search_index(col)?;
                if has_index != property.is_indexed {
                    if property.is_indexed {
                        table.add_search_index(col)?;
                        tracing::debug!("Added index on '{}.{}'", table_name, property.name);
                    } else {
                        table.remove_search_index(col)?;
                        tracing::debug!("Dropped index on '{}.{}'", table_name, property.name);
                    }
                    changed = true;
                }
            }
        }
    }

    Ok(changed)
}

/// Brings a store up to date with a target schema and version.
///
/// Runs inside the caller's write transaction: bootstraps the metadata
/// tables, reconciles physical tables against the target schema,
/// validates every descriptor (recording column positions), invokes
/// `migration` at most once when an already-versioned store moves to a
/// newer version, and finally persists the new version. A store whose
/// stored version is newer than `version` is rejected before any table
/// mutation.
///
/// # Returns
/// Whether any physical change was made.
pub fn update_store_with_schema<'g, F>(
    txn: &mut WriteTransaction<'g>,
    version: u64,
    target_schema: &mut [ObjectSchema],
    migration: Option<F>,
) -> Result<bool, SchemaError>
where
    F: FnOnce(&mut WriteTransaction<'g>),
{
    let mut changed = create_metadata_tables(txn)?;

    let stored = get_schema_version(txn.group());
    let migrating = is_migration_required(txn.group(), version)?;

    changed = create_tables(txn, target_schema, migrating)? || changed;

    for object_schema in target_schema.iter_mut() {
        let errors = validate_schema_and_update_column_mapping(txn.group(), object_schema)?;
        if !errors.is_empty() {
            return Err(SchemaError::Validation {
                object_type: object_schema.name.clone(),
                errors,
            });
        }
    }

    if !migrating {
        return Ok(changed);
    }

    for object_schema in target_schema.iter() {
        set_primary_key_for_object(txn, &object_schema.name, object_schema.primary_key.as_deref())?;
    }

    // A store initialized by this call has nothing to migrate from.
    if stored != NOT_VERSIONED {
        tracing::debug!("Migrating store from version {} to {}", stored, version);
        if let Some(migration) = migration {
            migration(txn);
        }
    }

    set_schema_version(txn, version)?;
    Ok(true)
}
