//! Chromium-backed rendering sessions
//!
//! Each session launches its own headless Chromium process through
//! chromiumoxide, drives a single page, and tears the process down on close.

use crate::config::BrowserConfig;
use crate::crawler::loader::{RenderSession, Renderer};
use crate::HarvestError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};
use url::Url;

/// Delay between attempts to click an element that is not ready yet
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Bound on each browser shutdown step (close request, process exit, kill)
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a fresh Chromium process per session
pub struct ChromiumRenderer {
    config: BrowserConfig,
    request_timeout: Duration,
}

impl ChromiumRenderer {
    pub fn new(config: BrowserConfig, request_timeout: Duration) -> Self {
        Self {
            config,
            request_timeout,
        }
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn open(&self, url: &Url) -> Result<Box<dyn RenderSession>, HarvestError> {
        let (browser, handler) = launch_browser(&self.config, self.request_timeout).await?;
        let mut session = ChromiumSession {
            browser,
            handler,
            page: None,
            closed: false,
        };

        // On error the session is dropped here, which kills the process
        let page = session
            .browser
            .new_page(url.as_str())
            .await
            .map_err(|e| browser_error("Failed to open page", e))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| browser_error("Failed to wait for page load", e))?;

        session.page = Some(page);
        Ok(Box::new(session))
    }
}

/// Launch a Chromium instance and spawn its CDP event handler
///
/// The returned `JoinHandle` must be aborted once the browser is done;
/// `ChromiumSession` takes care of that.
async fn launch_browser(
    config: &BrowserConfig,
    request_timeout: Duration,
) -> Result<(Browser, JoinHandle<()>), HarvestError> {
    let mut builder = ChromeConfig::builder()
        .request_timeout(request_timeout)
        .window_size(config.window_width, config.window_height)
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--disable-notifications")
        .arg("--disable-extensions")
        .arg("--mute-audio");

    if !config.headless {
        builder = builder.with_head();
    }
    if let Some(executable) = &config.executable {
        builder = builder.chrome_executable(executable);
    }

    let chrome_config = builder
        .build()
        .map_err(|e| HarvestError::Browser(format!("Failed to build browser config: {}", e)))?;

    debug!("Launching browser (headless: {})", config.headless);
    let (browser, mut handler) = Browser::launch(chrome_config)
        .await
        .map_err(|e| browser_error("Failed to launch browser", e))?;

    let handler_task = tokio::task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                trace!("Browser handler error: {:?}", e);
            }
        }
        trace!("Browser event handler task completed");
    });

    Ok((browser, handler_task))
}

/// One browser process with one page
///
/// Dropping without `close` aborts the handler and lets chromiumoxide kill the
/// child process.
pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
    closed: bool,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, HarvestError> {
        self.page
            .as_ref()
            .ok_or_else(|| HarvestError::Browser("Session has no open page".to_string()))
    }
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn click_when_ready(
        &mut self,
        locator: &str,
        timeout: Duration,
    ) -> Result<bool, HarvestError> {
        let page = self.page()?;
        let start = Instant::now();

        loop {
            let remaining = timeout.saturating_sub(start.elapsed());
            if remaining.is_zero() {
                trace!("No clickable element for {} after {:?}", locator, timeout);
                return Ok(false);
            }

            match tokio::time::timeout(remaining, try_click(page, locator)).await {
                Ok(true) => {
                    trace!("Clicked {} after {:?}", locator, start.elapsed());
                    return Ok(true);
                }
                Ok(false) => tokio::time::sleep(POLL_INTERVAL.min(remaining)).await,
                Err(_) => return Ok(false),
            }
        }
    }

    async fn current_document(&mut self) -> Result<String, HarvestError> {
        self.page()?
            .content()
            .await
            .map_err(|e| browser_error("Failed to read page content", e))
    }

    async fn close(self: Box<Self>) -> Result<(), HarvestError> {
        let mut session = self;

        if let Some(page) = session.page.take() {
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, page.close()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("Failed to close page cleanly: {}", e),
                Err(_) => debug!("Page did not close within {:?}", SHUTDOWN_TIMEOUT),
            }
        }

        // The handler must keep running until the browser has been told to close
        let result = shutdown(&mut session.browser, SHUTDOWN_TIMEOUT).await;

        session.handler.abort();
        session.closed = true;
        result
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if !self.closed {
            warn!("ChromiumSession dropped without close - aborting handler task");
        }
        self.handler.abort();
    }
}

/// Finds the element, scrolls it into view and clicks it
///
/// `false` when the element is missing or not interactable yet (hidden,
/// detached, zero-size).
async fn try_click(page: &Page, locator: &str) -> bool {
    let element = match page.find_xpath(locator).await {
        Ok(element) => element,
        Err(_) => return false,
    };

    if element.scroll_into_view().await.is_err() {
        return false;
    }

    element.click().await.is_ok()
}

/// The shutdown operations of a launched browser process
#[async_trait]
trait BrowserProcess: Send {
    /// Asks the browser to close over CDP
    async fn request_close(&mut self) -> Result<(), HarvestError>;

    /// Waits for the child process to exit
    async fn wait_exit(&mut self) -> Result<(), HarvestError>;

    /// Kills the child process and reaps it
    async fn force_kill(&mut self) -> Result<(), HarvestError>;
}

#[async_trait]
impl BrowserProcess for Browser {
    async fn request_close(&mut self) -> Result<(), HarvestError> {
        self.close()
            .await
            .map(|_| ())
            .map_err(|e| browser_error("Failed to close browser", e))
    }

    async fn wait_exit(&mut self) -> Result<(), HarvestError> {
        self.wait()
            .await
            .map(|_| ())
            .map_err(|e| HarvestError::Browser(format!("Failed to wait for browser exit: {}", e)))
    }

    async fn force_kill(&mut self) -> Result<(), HarvestError> {
        match self.kill().await {
            Some(Err(e)) => Err(HarvestError::Browser(format!(
                "Failed to kill browser: {}",
                e
            ))),
            _ => Ok(()),
        }
    }
}

/// Stops a browser process, falling back to kill when it does not go quietly
///
/// Every step is bounded by `limit`. The result reflects the close request:
/// a browser that acknowledged close but then had to be killed is still `Ok`.
async fn shutdown(process: &mut dyn BrowserProcess, limit: Duration) -> Result<(), HarvestError> {
    let closed = match tokio::time::timeout(limit, process.request_close()).await {
        Ok(result) => result,
        Err(_) => Err(HarvestError::Browser(format!(
            "Browser did not acknowledge close within {:?}",
            limit
        ))),
    };

    let exited = match &closed {
        Ok(()) => match tokio::time::timeout(limit, process.wait_exit()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!("{}", e);
                false
            }
            Err(_) => {
                warn!("Browser process still running {:?} after close", limit);
                false
            }
        },
        Err(_) => false,
    };

    if !exited {
        debug!("Killing browser process");
        match tokio::time::timeout(limit, process.force_kill()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("{}", e),
            Err(_) => warn!("Browser process did not die within {:?}", limit),
        }
    }

    closed
}

fn browser_error(context: &str, error: chromiumoxide::error::CdpError) -> HarvestError {
    HarvestError::Browser(format!("{}: {}", context, error))
}
