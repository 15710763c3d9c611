//! Crawler module for page fetching and record extraction
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching of category pages
//! - HTML parsing and typed element lookups
//! - "Load more" detection and interactive expansion in a browser
//! - Product record extraction
//! - Overall run coordination

mod browser;
mod coordinator;
mod document;
mod extractor;
mod fetcher;
mod loader;
mod pagination;

pub use browser::{ChromiumRenderer, ChromiumSession};
pub use coordinator::{run_targets, Coordinator};
pub use document::{element_text, find_optional, find_required, required_attr, CssQuery, Document};
pub use extractor::{
    normalize_description, parse_price, parse_review_count, ExtractionError, FieldError,
    ProductExtractor,
};
pub use fetcher::{build_http_client, fetch_page, user_agent_string};
pub use loader::{link_text_xpath, InteractiveLoader, LoaderSettings, RenderSession, Renderer};
pub use pagination::has_load_more;

use url::Url;

/// One category page and the destination its records are written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTarget {
    /// Output name, e.g. "laptops.csv"
    pub destination: String,

    /// Absolute page URL
    pub url: Url,
}
