//! Diff between scraped items and stored state

use crate::state::Item;
use crate::storage::WriteOp;
use std::collections::HashMap;

/// What to do with one scraped item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// No stored item has this title
    Insert(Item),

    /// Stored item differs in price or rating
    Update(Item),

    /// Stored item already matches
    Unchanged(String),
}

impl Change {
    /// The write this change needs, if any
    pub fn into_write(self) -> Option<WriteOp> {
        match self {
            Self::Insert(item) => Some(WriteOp::Insert(item)),
            Self::Update(item) => Some(WriteOp::Update(item)),
            Self::Unchanged(_) => None,
        }
    }
}

/// Classifies each scraped item against the stored items with the same title
///
/// The result is in scraped order. A title scraped twice is classified twice
/// against the same stored state.
pub fn diff_items(scraped: &[Item], stored: &[Item]) -> Vec<Change> {
    let stored_by_title: HashMap<&str, &Item> =
        stored.iter().map(|item| (item.title.as_str(), item)).collect();

    scraped
        .iter()
        .map(|item| match stored_by_title.get(item.title.as_str()) {
            None => Change::Insert(item.clone()),
            Some(existing) if item.differs_from(existing) => Change::Update(item.clone()),
            Some(_) => Change::Unchanged(item.title.clone()),
        })
        .collect()
}
