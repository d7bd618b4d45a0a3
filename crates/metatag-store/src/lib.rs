//! Metatag Store: SQLite rule store, entity metadata records and content mirror.

pub mod reference;
pub mod schema;
pub mod sqlite;
pub mod types;

pub use reference::ReferenceFieldIndex;
pub use sqlite::SqliteStore;
pub use types::*;
