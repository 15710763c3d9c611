//! Product record extraction
//!
//! Every product block on a category page is mapped to a `Product`. A block
//! missing any required sub-element, or holding a malformed number, fails the
//! whole page: partial catalogs are never written.

use crate::config::SelectorConfig;
use crate::crawler::document::{element_text, find_required, required_attr, CssQuery, Document};
use crate::product::Product;
use crate::ConfigError;
use scraper::ElementRef;
use thiserror::Error;

/// Why a single field could not be read from a product block
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("missing element '{selector}' for {field}")]
    MissingElement {
        field: &'static str,
        selector: String,
    },

    #[error("missing attribute '{attribute}' for {field}")]
    MissingAttribute {
        field: &'static str,
        attribute: &'static str,
    },

    #[error("{field} is empty")]
    EmptyField { field: &'static str },

    #[error("{field} is not a valid number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} has no leading token in '{value}'")]
    MissingToken { field: &'static str, value: String },
}

/// A product block that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Error)]
#[error("product block #{index}: {source}")]
pub struct ExtractionError {
    /// 1-based position of the block in the document
    pub index: usize,

    /// The field that failed
    pub source: FieldError,
}

/// Maps product blocks of a parsed document to records
///
/// Selectors are compiled once at construction, so a bad selector surfaces as
/// a configuration error before any page is fetched.
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    product_block: CssQuery,
    title: CssQuery,
    description: CssQuery,
    price: CssQuery,
    rating_indicator: CssQuery,
    review_count: CssQuery,
    currency_symbol: String,
}

impl ProductExtractor {
    /// Compiles the configured selectors
    pub fn new(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            product_block: CssQuery::parse("product-block", &config.product_block)?,
            title: CssQuery::parse("title", &config.title)?,
            description: CssQuery::parse("description", &config.description)?,
            price: CssQuery::parse("price", &config.price)?,
            rating_indicator: CssQuery::parse("rating-indicator", &config.rating_indicator)?,
            review_count: CssQuery::parse("review-count", &config.review_count)?,
            currency_symbol: config.currency_symbol.clone(),
        })
    }

    /// Number of product blocks in the document
    pub fn count_blocks(&self, document: &Document) -> usize {
        document.count(&self.product_block)
    }

    /// Extracts every product block in document order
    ///
    /// Stops at the first block that fails; no records are returned in that case.
    pub fn extract(&self, document: &Document) -> Result<Vec<Product>, ExtractionError> {
        document
            .select(&self.product_block)
            .enumerate()
            .map(|(i, block)| {
                self.extract_block(block)
                    .map_err(|source| ExtractionError {
                        index: i + 1,
                        source,
                    })
            })
            .collect()
    }

    fn extract_block(&self, block: ElementRef<'_>) -> Result<Product, FieldError> {
        let anchor = find_required(block, &self.title, "title")?;
        let title = required_attr(anchor, "title", "title")?;
        if title.trim().is_empty() {
            return Err(FieldError::EmptyField { field: "title" });
        }

        let description = normalize_description(&element_text(find_required(
            block,
            &self.description,
            "description",
        )?));

        let price = parse_price(
            &element_text(find_required(block, &self.price, "price")?),
            &self.currency_symbol,
        )?;

        let rating = rating_from_count(block.select(self.rating_indicator.selector()).count())?;

        let num_of_reviews = parse_review_count(&element_text(find_required(
            block,
            &self.review_count,
            "num_of_reviews",
        )?))?;

        Ok(Product {
            title: title.to_string(),
            description,
            price,
            rating,
            num_of_reviews,
        })
    }
}

/// Converts the number of rating indicators into the record's rating
fn rating_from_count(count: usize) -> Result<u32, FieldError> {
    u32::try_from(count).map_err(|_| FieldError::InvalidNumber {
        field: "rating",
        value: count.to_string(),
    })
}

/// Replaces non-breaking spaces with regular spaces
pub fn normalize_description(text: &str) -> String {
    text.replace('\u{a0}', " ")
}

/// Parses a currency-prefixed price such as `$295.99`
///
/// The currency symbol is stripped from the front, surrounding whitespace is
/// ignored, and the remainder must be a finite, non-negative decimal.
pub fn parse_price(text: &str, currency_symbol: &str) -> Result<f64, FieldError> {
    let trimmed = text.trim();
    let amount = trimmed
        .strip_prefix(currency_symbol)
        .unwrap_or(trimmed)
        .trim();

    let invalid = || FieldError::InvalidNumber {
        field: "price",
        value: text.to_string(),
    };

    let value: f64 = amount.parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }

    Ok(value)
}

/// Parses the leading integer of a review count such as `14 reviews`
pub fn parse_review_count(text: &str) -> Result<u32, FieldError> {
    let token = text
        .split_whitespace()
        .next()
        .ok_or_else(|| FieldError::MissingToken {
            field: "num_of_reviews",
            value: text.to_string(),
        })?;

    token.parse().map_err(|_| FieldError::InvalidNumber {
        field: "num_of_reviews",
        value: text.to_string(),
    })
}
