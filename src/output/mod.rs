//! Output module for harvest reports
//!
//! This module handles:
//! - The end-of-run summary of pages and item changes
//! - Statistics about what the store holds

pub mod stats;
mod summary;

pub use stats::{load_statistics, print_statistics, StoreStatistics};
pub use summary::{print_summary, HarvestSummary, SkippedPageSummary};
