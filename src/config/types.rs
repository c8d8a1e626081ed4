use serde::Deserialize;

/// Main configuration structure for a harvest run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(rename = "rate-limit", default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub storage: StorageConfig,
}

/// Where the catalog lives and which pages to walk
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Page URL prefix; the page number is appended to it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Suffix appended after the page number
    #[serde(rename = "page-suffix", default = "default_page_suffix")]
    pub page_suffix: String,

    /// Page limit assumed until the real one is discovered
    #[serde(rename = "default-page-limit", default = "default_page_limit")]
    pub default_page_limit: u32,

    /// First page to fetch (inclusive)
    #[serde(rename = "start-page")]
    pub start_page: u32,

    /// Last page to fetch (inclusive)
    #[serde(rename = "end-page")]
    pub end_page: u32,
}

impl CatalogConfig {
    /// Builds the URL for a catalog page
    pub fn page_url(&self, page: u32) -> String {
        format!("{}{}{}", self.base_url, page, self.page_suffix)
    }
}

/// Outbound request throttling
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Minimum time between requests (milliseconds), one request per interval
    #[serde(rename = "interval-ms", default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Upper bound of the post-acquire jitter delay (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_page_suffix() -> String {
    ".html".to_string()
}

fn default_page_limit() -> u32 {
    100
}

fn default_interval_ms() -> u64 {
    2000
}

fn default_max_delay_ms() -> u64 {
    6000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}
