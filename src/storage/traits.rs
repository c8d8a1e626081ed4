//! Storage traits and error types
//!
//! This module defines the trait interface for item stores and the
//! operation/outcome types of a bulk write.

use crate::state::Item;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Duplicate title: {0}")]
    DuplicateKey(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StorageError {
    /// Whether a bulk write can keep going after this error
    ///
    /// Duplicate keys and vanished rows only affect their own operation.
    /// Anything else means the store itself is in trouble.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DuplicateKey(_) | Self::ItemNotFound(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A single write in a bulk batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Insert a new item; fails with `DuplicateKey` if the title exists
    Insert(Item),

    /// Replace price and rating of the item with this title
    Update(Item),
}

impl WriteOp {
    pub fn item(&self) -> &Item {
        match self {
            Self::Insert(item) | Self::Update(item) => item,
        }
    }

    pub fn title(&self) -> &str {
        &self.item().title
    }
}

/// A write that did not apply
#[derive(Debug)]
pub struct WriteFailure {
    /// Position of the operation in the submitted batch
    pub index: usize,

    pub title: String,

    pub error: StorageError,
}

/// Result of a bulk write
///
/// Operations are independent: everything counted here is committed, even
/// when the batch halted part way.
#[derive(Debug, Default)]
pub struct BulkWriteOutcome {
    pub inserted: usize,
    pub updated: usize,
    pub failures: Vec<WriteFailure>,

    /// Set when an unrecoverable error stopped the batch; the remaining
    /// operations were not attempted
    pub halted: bool,
}

impl BulkWriteOutcome {
    /// Number of operations that committed
    pub fn applied(&self) -> usize {
        self.inserted + self.updated
    }

    /// Titles rejected by the unique index
    pub fn duplicate_titles(&self) -> Vec<&str> {
        self.failures
            .iter()
            .filter(|f| matches!(f.error, StorageError::DuplicateKey(_)))
            .map(|f| f.title.as_str())
            .collect()
    }
}

/// Trait for item store implementations
///
/// The store enforces title uniqueness itself, so a racing duplicate insert
/// fails cleanly instead of producing two rows.
pub trait Storage {
    /// Loads every stored item whose title is in `titles`, in one lookup
    fn find_by_titles(&self, titles: &[&str]) -> StorageResult<Vec<Item>>;

    /// Applies a batch of independent inserts and updates
    ///
    /// Recoverable failures are recorded and the batch continues. The first
    /// unrecoverable failure is recorded and halts the batch.
    fn bulk_write(&mut self, ops: &[WriteOp]) -> BulkWriteOutcome;

    // ===== Statistics =====

    /// Total number of stored items
    fn count_items(&self) -> StorageResult<u64>;

    /// Item count per rating value
    fn rating_breakdown(&self) -> StorageResult<BTreeMap<u8, u64>>;
}
