//! Columnar storage engine for the in-memory object database.
//!
//! Provides groups of columnar tables, typed cell storage, secondary
//! indexes, and scoped write transactions with abort-on-drop.

pub mod error;
pub mod group;
pub mod table;
pub mod transaction;
pub mod value;

pub use error::StoreError;
pub use group::Group;
pub use table::{Column, Table};
pub use transaction::WriteTransaction;
pub use value::{ColumnType, Value};
