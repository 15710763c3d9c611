//! HTML document parsing and typed element lookups
//!
//! This module wraps `scraper::Html` so the rest of the crawler can:
//! - Parse raw bytes or text into a queryable tree
//! - Run pre-compiled CSS queries against it
//! - Look up required sub-elements and attributes with explicit errors

use crate::config::validation::compile_selector;
use crate::crawler::extractor::FieldError;
use crate::{ConfigError, HarvestError};
use scraper::{ElementRef, Html, Selector};

/// A compiled CSS selector that remembers its source text
///
/// The source text is what appears in extraction error messages.
#[derive(Debug, Clone)]
pub struct CssQuery {
    css: String,
    selector: Selector,
}

impl CssQuery {
    /// Compiles `css`; `field` names the configuration key in errors
    pub fn parse(field: &'static str, css: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            css: css.to_string(),
            selector: compile_selector(field, css)?,
        })
    }

    /// The selector source text
    pub fn css(&self) -> &str {
        &self.css
    }

    /// The compiled selector
    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

/// A parsed HTML document, from a plain fetch or a rendered browser session
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses raw response bytes
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected, and
    /// malformed markup still yields a best-effort tree. Only an empty body
    /// counts as unparsable.
    ///
    /// # Arguments
    ///
    /// * `url` - Where the bytes came from (used in error messages)
    /// * `bytes` - The raw HTML
    pub fn parse(url: &str, bytes: &[u8]) -> Result<Self, HarvestError> {
        let text = String::from_utf8_lossy(bytes);
        Self::from_html(url, &text)
    }

    /// Parses HTML text
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_harvest::crawler::Document;
    ///
    /// let doc = Document::from_html("https://example.com/", "<p>Hello</p>").unwrap();
    /// assert!(doc.root().html().contains("Hello"));
    /// ```
    pub fn from_html(url: &str, html: &str) -> Result<Self, HarvestError> {
        if html.trim().is_empty() {
            return Err(HarvestError::Parse {
                url: url.to_string(),
                message: "document is empty".to_string(),
            });
        }

        let html = Html::parse_document(html);
        if !html.errors.is_empty() {
            tracing::trace!(
                "Recovered from {} HTML parse errors in {}",
                html.errors.len(),
                url
            );
        }

        Ok(Self { html })
    }

    /// The document's root element
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// All elements matching `query`, in document order
    pub fn select<'a>(&'a self, query: &'a CssQuery) -> scraper::html::Select<'a, 'a> {
        self.html.select(query.selector())
    }

    /// Number of elements matching `query`
    pub fn count(&self, query: &CssQuery) -> usize {
        self.select(query).count()
    }
}

/// Finds the first descendant of `scope` matching `query`, failing when absent
pub fn find_required<'a>(
    scope: ElementRef<'a>,
    query: &CssQuery,
    field: &'static str,
) -> Result<ElementRef<'a>, FieldError> {
    find_optional(scope, query).ok_or_else(|| FieldError::MissingElement {
        field,
        selector: query.css().to_string(),
    })
}

/// Finds the first descendant of `scope` matching `query`, if any
pub fn find_optional<'a>(scope: ElementRef<'a>, query: &CssQuery) -> Option<ElementRef<'a>> {
    scope.select(query.selector()).next()
}

/// Reads an attribute that must be present
pub fn required_attr<'a>(
    element: ElementRef<'a>,
    attribute: &'static str,
    field: &'static str,
) -> Result<&'a str, FieldError> {
    element
        .value()
        .attr(attribute)
        .ok_or(FieldError::MissingAttribute { field, attribute })
}

/// Concatenated text of an element and all its descendants
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
