//! Output sink trait and error types
//!
//! A sink receives the records of one category page, in document order, and
//! stores them under a destination name.

use crate::product::Product;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize record for {destination}: {source}")]
    Serialize {
        destination: String,
        source: csv::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Where extracted records go
///
/// `write` is called once per target, after every block of the page has been
/// extracted. Implementations must not leave a partial file behind on error.
pub trait ProductSink: Send + Sync {
    /// Stores `products` under `destination`, returning where they went
    ///
    /// # Arguments
    ///
    /// * `destination` - Destination identifier (e.g. "laptops.csv")
    /// * `products` - Records in page order
    fn write(&self, destination: &str, products: &[Product]) -> OutputResult<PathBuf>;
}
