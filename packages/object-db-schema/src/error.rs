//! Schema layer error types.

use object_db_core::StoreError;
use thiserror::Error;

/// Schema reconciliation and migration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The target schema cannot be satisfied by the physical tables.
    /// Carries every validation error found for the type, so callers
    /// can report all schema problems at once.
    #[error("Schema validation failed for type '{object_type}': {}", .errors.join("; "))]
    Validation {
        object_type: String,
        errors: Vec<String>,
    },

    /// The stored schema version is newer than the requested one.
    /// Never auto-resolved; a downgrade must be an explicit caller
    /// decision.
    #[error("Stored schema version {stored} is newer than requested version {requested}")]
    VersionOrder { stored: u64, requested: u64 },

    /// Storage engine failure
    #[error(transparent)]
    Store(#[from] StoreError),
}
