//! URL handling module for Catalog-Harvest
//!
//! Target URLs in the configuration may be absolute or relative to a
//! `base-url`; this module turns them into absolute HTTP(S) URLs.

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses the configured base URL
///
/// The base must be an absolute HTTP(S) URL. A base without a trailing slash
/// behaves like a file when joined ("https://a.com/x" + "y" = "https://a.com/y"),
/// which is standard URL resolution and left as is.
pub fn parse_base_url(base: &str) -> UrlResult<Url> {
    let url = Url::parse(base.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", base, e)))?;
    ensure_http(&url)?;
    Ok(url)
}

/// Resolves a target URL, joining it against `base` when it is relative
///
/// # Examples
///
/// ```
/// use catalog_harvest::url::{parse_base_url, resolve_url};
///
/// let base = parse_base_url("https://webscraper.io/").unwrap();
/// let url = resolve_url(Some(&base), "test-sites/e-commerce/more/phones").unwrap();
/// assert_eq!(url.as_str(), "https://webscraper.io/test-sites/e-commerce/more/phones");
/// ```
pub fn resolve_url(base: Option<&Url>, raw: &str) -> UrlResult<Url> {
    let raw = raw.trim();

    let url = match Url::parse(raw) {
        Ok(absolute) => absolute,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = base.ok_or_else(|| UrlError::MissingBase(raw.to_string()))?;
            base.join(raw)
                .map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?
        }
        Err(e) => return Err(UrlError::Parse(format!("{}: {}", raw, e))),
    };

    ensure_http(&url)?;
    Ok(url)
}

fn ensure_http(url: &Url) -> UrlResult<()> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}
