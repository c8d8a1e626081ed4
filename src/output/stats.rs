//! Statistics about the item store
//!
//! This module provides functionality for extracting and displaying
//! what the store currently holds.

use crate::storage::Storage;
use crate::HarvestError;
use std::collections::BTreeMap;

/// Store statistics summary
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    /// Total number of stored items
    pub total_items: u64,

    /// Item count per rating (0 = unrecognized label)
    pub items_by_rating: BTreeMap<u8, u64>,
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> Result<StoreStatistics, HarvestError> {
    let total_items = storage.count_items()?;
    let items_by_rating = storage.rating_breakdown()?;

    Ok(StoreStatistics {
        total_items,
        items_by_rating,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics ===\n");

    println!("Total items: {}", stats.total_items);
    println!();

    println!("Items by Rating:");
    for (rating, count) in &stats.items_by_rating {
        let percentage = if stats.total_items > 0 {
            (*count as f64 / stats.total_items as f64) * 100.0
        } else {
            0.0
        };
        let label = if *rating == 0 {
            "unrated".to_string()
        } else {
            format!("{}★", rating)
        };
        println!("  {}: {} ({:.1}%)", label, count, percentage);
    }
}
