//! Storage module for persisting harvested items
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Batched lookup of stored items by title
//! - Unordered bulk inserts and updates with per-operation outcomes

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{BulkWriteOutcome, Storage, StorageError, StorageResult, WriteFailure, WriteOp};
