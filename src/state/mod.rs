//! State module for harvest data
//!
//! # Components
//!
//! - `Item`: One catalog entry as scraped from a listing page
//! - `CatalogCursor`: Tracks the catalog's page limit during a single crawl

mod cursor;
mod item;

// Re-export main types
pub use cursor::{CatalogCursor, DEFAULT_PAGE_LIMIT};
pub use item::{rating_from_label, Item};
