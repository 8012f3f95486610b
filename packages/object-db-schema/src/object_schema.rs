//! Object-schema descriptors and physical-schema introspection.

use object_db_core::{Group, StoreError};
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::property::{Property, PropertyType};
use crate::store;

/// One logical object type: a name plus its ordered properties.
///
/// Two kinds of instance exist: descriptors introspected from physical
/// tables (the physical schema) and descriptors assembled by the
/// caller (the target schema). Reconciliation records physical column
/// positions onto target descriptors; it never mutates introspected
/// snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    /// Logical type name, unique across the schema
    pub name: String,
    /// Properties in declaration (or physical-column) order
    pub properties: Vec<Property>,
    /// Name of the primary-key property, if any
    pub primary_key: Option<String>,
}

impl ObjectSchema {
    /// Creates a target-schema descriptor from caller-supplied
    /// properties.
    pub fn new(name: impl Into<String>, properties: Vec<Property>) -> Self {
        Self {
            name: name.into(),
            properties,
            primary_key: None,
        }
    }

    /// Designates the primary-key property, marking it on the property
    /// list when present.
    ///
    /// A primary key naming a property that does not exist is reported
    /// during validation, not here, so schemas can be declared up
    /// front.
    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        let primary_key = primary_key.into();
        if let Some(property) = self.property_for_name(&primary_key) {
            property.is_primary = true;
        }
        self.primary_key = Some(primary_key);
        self
    }

    /// Builds the descriptor for one logical type by introspecting its
    /// physical table: one property per column, link columns translated
    /// back to logical type names, index flags read from the table.
    ///
    /// # Returns
    /// A validation error if the registered primary key names a
    /// property that does not exist on the table; no partial
    /// descriptor is returned in that case.
    pub fn from_group(group: &Group, name: &str) -> Result<Self, SchemaError> {
        let table = store::table_for_object_type(group, name).ok_or_else(|| {
            StoreError::TableNotFound {
                table: store::table_name_for_object_type(name),
            }
        })?;

        let mut properties = Vec::with_capacity(table.column_count());
        for col in 0..table.column_count() {
            let column_type = table.column_type(col)?;
            let object_type = if column_type.is_link() {
                let target = table.link_target(col)?;
                store::object_type_for_table_name(target).map(str::to_string)
            } else {
                None
            };
            properties.push(Property {
                name: table.column_name(col)?.to_string(),
                ty: PropertyType::from(column_type),
                object_type,
                is_indexed: table.has_search_index(col)?,
                is_primary: false,
                table_column: Some(col),
            });
        }

        let mut schema = Self {
            name: name.to_string(),
            properties,
            primary_key: None,
        };

        if let Some(primary_key) = store::get_primary_key_for_object(group, name) {
            match schema.property_for_name(&primary_key) {
                Some(property) => property.is_primary = true,
                None => {
                    return Err(SchemaError::Validation {
                        object_type: name.to_string(),
                        errors: vec![format!(
                            "No property matching primary key '{}'",
                            primary_key
                        )],
                    });
                }
            }
            schema.primary_key = Some(primary_key);
        }

        Ok(schema)
    }

    /// Returns the property with the given name, mutably. Linear scan,
    /// no side effects.
    pub fn property_for_name(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    /// Returns the primary-key property, if one is designated.
    pub fn primary_key_property(&self) -> Option<&Property> {
        let primary_key = self.primary_key.as_deref()?;
        self.properties.iter().find(|p| p.name == primary_key)
    }
}

/// Introspects every logical-type table in the group, in physical
/// iteration order. Tables outside the type naming convention
/// (metadata and system tables) are skipped.
pub fn schema_from_group(group: &Group) -> Result<Vec<ObjectSchema>, SchemaError> {
    let mut schema = Vec::new();
    for table_name in group.table_names() {
        if let Some(object_type) = store::object_type_for_table_name(table_name) {
            schema.push(ObjectSchema::from_group(group, object_type)?);
        }
    }
    Ok(schema)
}
