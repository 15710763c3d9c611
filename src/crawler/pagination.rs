//! Detection of progressively loaded category pages

use crate::crawler::document::{find_optional, CssQuery, Document};

/// Returns true when the document carries a "load more" control
///
/// Pages without it are complete as served; pages with it only list the first
/// batch of products until the control is clicked in a browser.
pub fn has_load_more(document: &Document, load_more: &CssQuery) -> bool {
    find_optional(document.root(), load_more).is_some()
}
