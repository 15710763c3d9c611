use serde::Deserialize;

/// Site the built-in target table points at
pub const DEFAULT_BASE_URL: &str = "https://webscraper.io/";

/// Main configuration structure for Catalog-Harvest
///
/// Every section has defaults, so an empty file (or no file at all) yields the
/// built-in six-category table.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL that relative target URLs are joined against
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: Option<String>,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(rename = "target", default = "default_targets")]
    pub targets: Vec<TargetEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            browser: BrowserConfig::default(),
            output: OutputConfig::default(),
            selectors: SelectorConfig::default(),
            targets: default_targets(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// How long to wait for the consent control to become clickable (milliseconds)
    #[serde(rename = "consent-timeout-ms", default = "default_click_timeout_ms")]
    pub consent_timeout_ms: u64,

    /// How long to wait for the next "load more" click before treating the page as exhausted
    #[serde(rename = "load-more-timeout-ms", default = "default_click_timeout_ms")]
    pub load_more_timeout_ms: u64,

    /// Upper bound on "load more" clicks per page
    #[serde(rename = "max-load-more-clicks", default = "default_max_load_more_clicks")]
    pub max_load_more_clicks: u32,

    /// Timeout for plain HTTP fetches (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Keep processing later targets when one fails
    #[serde(rename = "isolate-failures", default)]
    pub isolate_failures: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            consent_timeout_ms: default_click_timeout_ms(),
            load_more_timeout_ms: default_click_timeout_ms(),
            max_load_more_clicks: default_max_load_more_clicks(),
            request_timeout_secs: default_request_timeout_secs(),
            isolate_failures: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Path to a Chrome/Chromium binary; auto-detected when absent
    #[serde(default)]
    pub executable: Option<String>,

    /// Run without a visible window
    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(rename = "window-width", default = "default_window_width")]
    pub window_width: u32,

    #[serde(rename = "window-height", default = "default_window_height")]
    pub window_height: u32,

    /// Text of the consent link that must be clicked first
    #[serde(rename = "consent-button-text", default = "default_consent_text")]
    pub consent_button_text: String,

    /// Text of the "load more" link
    #[serde(rename = "load-more-button-text", default = "default_load_more_text")]
    pub load_more_button_text: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            window_width: default_window_width(),
            window_height: default_window_height(),
            consent_button_text: default_consent_text(),
            load_more_button_text: default_load_more_text(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the per-category CSV files are written into
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

/// CSS selectors describing the catalog markup
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    #[serde(rename = "load-more", default = "default_load_more_selector")]
    pub load_more: String,

    #[serde(rename = "product-block", default = "default_product_block_selector")]
    pub product_block: String,

    /// Anchor carrying the product name in its `title` attribute
    #[serde(default = "default_title_selector")]
    pub title: String,

    #[serde(default = "default_description_selector")]
    pub description: String,

    #[serde(default = "default_price_selector")]
    pub price: String,

    /// Each match counts as one rating point
    #[serde(rename = "rating-indicator", default = "default_rating_selector")]
    pub rating_indicator: String,

    #[serde(rename = "review-count", default = "default_review_count_selector")]
    pub review_count: String,

    /// Prefix stripped from the price text
    #[serde(rename = "currency-symbol", default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            load_more: default_load_more_selector(),
            product_block: default_product_block_selector(),
            title: default_title_selector(),
            description: default_description_selector(),
            price: default_price_selector(),
            rating_indicator: default_rating_selector(),
            review_count: default_review_count_selector(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// One category page and the file its products go to
#[derive(Debug, Clone, Deserialize)]
pub struct TargetEntry {
    /// Output file name (e.g. "laptops.csv")
    pub destination: String,

    /// Absolute URL, or a path relative to `base-url`
    pub url: String,
}

fn default_base_url() -> Option<String> {
    Some(DEFAULT_BASE_URL.to_string())
}

fn default_targets() -> Vec<TargetEntry> {
    [
        ("home.csv", "test-sites/e-commerce/more/"),
        ("computers.csv", "test-sites/e-commerce/more/computers"),
        ("phones.csv", "test-sites/e-commerce/more/phones"),
        ("touch.csv", "test-sites/e-commerce/more/phones/touch"),
        ("laptops.csv", "test-sites/e-commerce/more/computers/laptops"),
        ("tablets.csv", "test-sites/e-commerce/more/computers/tablets"),
    ]
    .into_iter()
    .map(|(destination, url)| TargetEntry {
        destination: destination.to_string(),
        url: url.to_string(),
    })
    .collect()
}

fn default_click_timeout_ms() -> u64 {
    2000
}

fn default_max_load_more_clicks() -> u32 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_crawler_name() -> String {
    "CatalogHarvest".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_true() -> bool {
    true
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_consent_text() -> String {
    "Accept & Continue".to_string()
}

fn default_load_more_text() -> String {
    "More".to_string()
}

fn default_output_directory() -> String {
    ".".to_string()
}

fn default_load_more_selector() -> String {
    "a.btn.btn-lg.btn-block.btn-primary".to_string()
}

fn default_product_block_selector() -> String {
    "div.col-md-4.col-xl-4.col-lg-4".to_string()
}

fn default_title_selector() -> String {
    "a.title".to_string()
}

fn default_description_selector() -> String {
    "p.description".to_string()
}

fn default_price_selector() -> String {
    "h4.price.float-end".to_string()
}

fn default_rating_selector() -> String {
    "div.ratings span".to_string()
}

fn default_review_count_selector() -> String {
    "p.review-count.float-end".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}
