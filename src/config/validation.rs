use crate::config::types::{
    BrowserConfig, Config, CrawlerConfig, OutputConfig, SelectorConfig, TargetEntry,
    UserAgentConfig,
};
use crate::url::{parse_base_url, resolve_url};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_browser_config(&config.browser)?;
    validate_output_config(&config.output)?;
    validate_selector_config(&config.selectors)?;
    validate_targets(config.base_url.as_deref(), &config.targets)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.consent_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "consent_timeout_ms must be > 0".to_string(),
        ));
    }

    if config.load_more_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "load_more_timeout_ms must be > 0".to_string(),
        ));
    }

    if config.max_load_more_clicks < 1 {
        return Err(ConfigError::Validation(format!(
            "max_load_more_clicks must be >= 1, got {}",
            config.max_load_more_clicks
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.window_width == 0 || config.window_height == 0 {
        return Err(ConfigError::Validation(format!(
            "window size must be non-zero, got {}x{}",
            config.window_width, config.window_height
        )));
    }

    for (name, text) in [
        ("consent_button_text", &config.consent_button_text),
        ("load_more_button_text", &config.load_more_button_text),
    ] {
        if text.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }

        // XPath 1.0 string literals cannot hold both quote kinds
        if text.contains('\'') && text.contains('"') {
            return Err(ConfigError::Validation(format!(
                "{} cannot contain both single and double quotes, got '{}'",
                name, text
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every selector compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (field, selector) in [
        ("load-more", &config.load_more),
        ("product-block", &config.product_block),
        ("title", &config.title),
        ("description", &config.description),
        ("price", &config.price),
        ("rating-indicator", &config.rating_indicator),
        ("review-count", &config.review_count),
    ] {
        compile_selector(field, selector)?;
    }

    if config.currency_symbol.is_empty() {
        return Err(ConfigError::Validation(
            "currency_symbol cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Compiles a CSS selector, mapping failures to a configuration error
pub(crate) fn compile_selector(field: &'static str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector {
        field,
        selector: selector.to_string(),
    })
}

/// Validates the target table
fn validate_targets(base_url: Option<&str>, targets: &[TargetEntry]) -> Result<(), ConfigError> {
    if targets.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[target]] is required".to_string(),
        ));
    }

    let base = base_url
        .map(parse_base_url)
        .transpose()
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    let mut seen = HashSet::new();
    for entry in targets {
        validate_destination(&entry.destination)?;

        if !seen.insert(entry.destination.as_str()) {
            return Err(ConfigError::Validation(format!(
                "destination '{}' is used by more than one target",
                entry.destination
            )));
        }

        resolve_url(base.as_ref(), &entry.url).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid URL for target '{}': {}",
                entry.destination, e
            ))
        })?;
    }

    Ok(())
}

/// Destinations are plain file names inside the output directory
fn validate_destination(destination: &str) -> Result<(), ConfigError> {
    if destination.trim().is_empty() {
        return Err(ConfigError::Validation(
            "target destination cannot be empty".to_string(),
        ));
    }

    if destination.contains('/')
        || destination.contains('\\')
        || destination == "."
        || destination == ".."
    {
        return Err(ConfigError::Validation(format!(
            "target destination '{}' must be a plain file name",
            destination
        )));
    }

    Ok(())
}
