//! Item record definitions

/// A single catalog entry
///
/// `title` is the natural key: no two persisted items share one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Display title, unique across the catalog
    pub title: String,

    /// Display price, kept as the site renders it (e.g. "£51.77")
    pub price: String,

    /// Star rating 1-5, or 0 when the label was not recognized
    pub rating: u8,
}

impl Item {
    pub fn new(title: impl Into<String>, price: impl Into<String>, rating: u8) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
            rating,
        }
    }

    /// Whether the mutable fields differ from another record with the same title
    pub fn differs_from(&self, other: &Item) -> bool {
        self.price != other.price || self.rating != other.rating
    }
}

/// Maps a rating label ("One" through "Five") to its numeric value
///
/// Anything else maps to 0.
pub fn rating_from_label(label: &str) -> u8 {
    match label {
        "One" => 1,
        "Two" => 2,
        "Three" => 3,
        "Four" => 4,
        "Five" => 5,
        _ => 0,
    }
}
