//! Shared helpers: fixtures, test configuration and a scripted renderer

use async_trait::async_trait;
use catalog_harvest::config::{Config, TargetEntry};
use catalog_harvest::crawler::{RenderSession, Renderer};
use catalog_harvest::HarvestError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const STATIC_CATEGORY: &str = include_str!("../fixtures/static_category.html");
pub const PAGINATED_CATEGORY: &str = include_str!("../fixtures/paginated_category.html");
pub const EXPANDED_CATEGORY: &str = include_str!("../fixtures/expanded_category.html");
pub const BAD_PRICE: &str = include_str!("../fixtures/bad_price.html");

pub const HEADER: &str = "title,description,price,rating,num_of_reviews";

/// Serves `body` as HTML at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Creates a test configuration with targets relative to the mock server
pub fn create_test_config(server: &MockServer, output_dir: &str, targets: &[(&str, &str)]) -> Config {
    let mut config = Config::default();
    config.base_url = Some(format!("{}/", server.uri()));
    config.output.directory = output_dir.to_string();
    config.crawler.consent_timeout_ms = 50;
    config.crawler.load_more_timeout_ms = 50;
    config.targets = targets
        .iter()
        .map(|(destination, url)| TargetEntry {
            destination: destination.to_string(),
            url: url.to_string(),
        })
        .collect();
    config
}

/// What the scripted renderer observed
#[derive(Debug, Default)]
pub struct RenderLog {
    pub opened: Vec<String>,
    pub closed: usize,
    pub clicks: Vec<String>,
}

/// Renderer that plays back a fixed page instead of launching a browser
///
/// The consent control is either clickable or never appears; the load-more
/// control can be clicked `more_clicks` times before it disappears.
pub struct ScriptedRenderer {
    pub consent_ready: bool,
    pub more_clicks: usize,
    pub rendered: String,
    pub log: Arc<Mutex<RenderLog>>,
}

impl ScriptedRenderer {
    pub fn new(consent_ready: bool, more_clicks: usize, rendered: &str) -> Arc<Self> {
        Arc::new(Self {
            consent_ready,
            more_clicks,
            rendered: rendered.to_string(),
            log: Arc::new(Mutex::new(RenderLog::default())),
        })
    }

    pub fn opened(&self) -> usize {
        self.log.lock().unwrap().opened.len()
    }

    pub fn closed(&self) -> usize {
        self.log.lock().unwrap().closed
    }
}

struct ScriptedSession {
    consent_ready: bool,
    more_remaining: usize,
    rendered: String,
    log: Arc<Mutex<RenderLog>>,
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn open(&self, url: &Url) -> Result<Box<dyn RenderSession>, HarvestError> {
        self.log.lock().unwrap().opened.push(url.to_string());
        Ok(Box::new(ScriptedSession {
            consent_ready: self.consent_ready,
            more_remaining: self.more_clicks,
            rendered: self.rendered.clone(),
            log: self.log.clone(),
        }))
    }
}

#[async_trait]
impl RenderSession for ScriptedSession {
    async fn click_when_ready(
        &mut self,
        locator: &str,
        _timeout: Duration,
    ) -> Result<bool, HarvestError> {
        let clicked = if locator.contains("Accept & Continue") {
            self.consent_ready
        } else if self.more_remaining > 0 {
            self.more_remaining -= 1;
            true
        } else {
            false
        };

        if clicked {
            self.log.lock().unwrap().clicks.push(locator.to_string());
        }
        Ok(clicked)
    }

    async fn current_document(&mut self) -> Result<String, HarvestError> {
        Ok(self.rendered.clone())
    }

    async fn close(self: Box<Self>) -> Result<(), HarvestError> {
        self.log.lock().unwrap().closed += 1;
        Ok(())
    }
}
