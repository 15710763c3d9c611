//! HTTP fetcher implementation
//!
//! Category pages are first fetched with a plain GET (no JavaScript). The raw
//! bytes feed the pagination detector; only pages with a "load more" control
//! are fetched again through a browser session.

use crate::config::UserAgentConfig;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `request_timeout` - Overall timeout for a single request
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::UserAgentConfig;
/// use catalog_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    request_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(request_timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the user agent: `CrawlerName/Version (+ContactURL)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    match &config.contact_url {
        Some(contact) => format!(
            "{}/{} (+{})",
            config.crawler_name, config.crawler_version, contact
        ),
        None => format!("{}/{}", config.crawler_name, config.crawler_version),
    }
}

/// Fetches a URL and returns the raw response body
///
/// One request, no retry. Network failures and non-success status codes are
/// both reported as `HarvestError::Fetch`.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<Vec<u8>, HarvestError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| HarvestError::Fetch {
            url: url.to_string(),
            reason: classify_request_error(&e),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Fetch {
            url: url.to_string(),
            reason: format!("HTTP {}", status.as_u16()),
        });
    }

    let body = response.bytes().await.map_err(|e| HarvestError::Fetch {
        url: url.to_string(),
        reason: format!("Failed to read body: {}", e),
    })?;

    tracing::debug!(
        "Fetched {} (HTTP {}, {} bytes)",
        url,
        status.as_u16(),
        body.len()
    );

    Ok(body.to_vec())
}

fn classify_request_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    }
}
