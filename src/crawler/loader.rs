//! Interactive loading of "load more" category pages
//!
//! Pages that reveal products progressively are opened in a rendering
//! session. The session must first accept the consent dialog; then the
//! "load more" control is clicked until it stops being clickable within a
//! short wait, which is how the page signals that everything is loaded.

use crate::config::{BrowserConfig, CrawlerConfig};
use crate::crawler::document::Document;
use crate::HarvestError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Something that can open rendering sessions (a headless browser, a remote
/// automation service, or a scripted fake in tests)
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Opens a session with `url` loaded
    async fn open(&self, url: &Url) -> Result<Box<dyn RenderSession>, HarvestError>;
}

/// A live rendering session owned by one page load
#[async_trait]
pub trait RenderSession: Send {
    /// Waits up to `timeout` for the element at `locator` (an XPath
    /// expression) to become clickable, scrolls it into view and clicks it
    ///
    /// Returns `Ok(false)` when the wait elapses without a click.
    async fn click_when_ready(
        &mut self,
        locator: &str,
        timeout: Duration,
    ) -> Result<bool, HarvestError>;

    /// The currently rendered HTML
    async fn current_document(&mut self) -> Result<String, HarvestError>;

    /// Releases the session and everything behind it
    async fn close(self: Box<Self>) -> Result<(), HarvestError>;
}

/// Locators and bounded waits used while expanding a page
#[derive(Debug, Clone)]
pub struct LoaderSettings {
    pub consent_locator: String,
    pub load_more_locator: String,
    pub consent_timeout: Duration,
    pub load_more_timeout: Duration,
    pub max_load_more_clicks: u32,
}

impl LoaderSettings {
    pub fn from_config(crawler: &CrawlerConfig, browser: &BrowserConfig) -> Self {
        Self {
            consent_locator: link_text_xpath(&browser.consent_button_text),
            load_more_locator: link_text_xpath(&browser.load_more_button_text),
            consent_timeout: Duration::from_millis(crawler.consent_timeout_ms),
            load_more_timeout: Duration::from_millis(crawler.load_more_timeout_ms),
            max_load_more_clicks: crawler.max_load_more_clicks,
        }
    }
}

/// Drives a rendering session until a paginated page is fully expanded
pub struct InteractiveLoader {
    renderer: Arc<dyn Renderer>,
    settings: LoaderSettings,
}

impl InteractiveLoader {
    pub fn new(renderer: Arc<dyn Renderer>, settings: LoaderSettings) -> Self {
        Self { renderer, settings }
    }

    /// Opens `url`, accepts consent, clicks "load more" until exhausted and
    /// returns the rendered document
    ///
    /// The session is closed before this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// * `HarvestError::ConsentTimeout` - the consent control never became clickable
    /// * `HarvestError::Browser` - the session failed
    /// * `HarvestError::Parse` - the rendered document was empty
    pub async fn load(&self, url: &Url) -> Result<Document, HarvestError> {
        let mut session = self.renderer.open(url).await?;
        tracing::debug!("Opened rendering session for {}", url);

        let expanded = self.expand(session.as_mut(), url).await;
        let closed = session.close().await;

        let html = match (expanded, closed) {
            (Ok(html), Ok(())) => html,
            (Ok(_), Err(close_err)) => return Err(close_err),
            (Err(e), Ok(())) => return Err(e),
            (Err(e), Err(close_err)) => {
                tracing::warn!("Failed to close session for {}: {}", url, close_err);
                return Err(e);
            }
        };

        Document::from_html(url.as_str(), &html)
    }

    async fn expand(
        &self,
        session: &mut dyn RenderSession,
        url: &Url,
    ) -> Result<String, HarvestError> {
        let settings = &self.settings;

        if !session
            .click_when_ready(&settings.consent_locator, settings.consent_timeout)
            .await?
        {
            return Err(HarvestError::ConsentTimeout {
                url: url.to_string(),
                waited: settings.consent_timeout,
            });
        }
        tracing::debug!("Accepted consent on {}", url);

        let mut clicks = 0u32;
        loop {
            if clicks >= settings.max_load_more_clicks {
                tracing::warn!(
                    "Stopped after {} load-more clicks on {}; output may be incomplete",
                    clicks,
                    url
                );
                break;
            }

            // A timeout here means there is nothing left to load
            if !session
                .click_when_ready(&settings.load_more_locator, settings.load_more_timeout)
                .await?
            {
                break;
            }
            clicks += 1;
        }

        tracing::debug!("Clicked load-more {} times on {}", clicks, url);
        session.current_document().await
    }
}

/// XPath for a link whose text contains `text`
///
/// # Example
///
/// ```
/// use catalog_harvest::crawler::link_text_xpath;
///
/// assert_eq!(link_text_xpath("More"), "//a[contains(text(), 'More')]");
/// ```
pub fn link_text_xpath(text: &str) -> String {
    format!("//a[contains(text(), {})]", xpath_literal(text))
}

fn xpath_literal(text: &str) -> String {
    if text.contains('\'') {
        format!("\"{}\"", text)
    } else {
        format!("'{}'", text)
    }
}
