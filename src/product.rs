//! Product record model
//!
//! A `Product` is created per product block during extraction, handed to the
//! sink and then dropped. Records carry no identity beyond their position.

use serde::Serialize;

/// Column order of every output file.
pub const CSV_HEADER: [&str; 5] = ["title", "description", "price", "rating", "num_of_reviews"];

/// One product as listed on a category page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    /// Full product name, taken from the title anchor's `title` attribute
    pub title: String,

    /// Short description with non-breaking spaces replaced by plain spaces
    pub description: String,

    /// Price without the currency symbol
    pub price: f64,

    /// Number of filled rating indicators
    pub rating: u32,

    /// Review count
    pub num_of_reviews: u32,
}
