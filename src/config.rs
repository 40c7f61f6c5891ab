use crate::error::ScrapeError;
use crate::export::ExportFormat;
use crate::heuristics::HeuristicConfig;
use crate::pagination::PaginationKind;
use crate::utils::OutputLocation;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Configuration for the plain HTTP fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpFetcherConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a transient failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay before the first retry, doubled on each further retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// User-Agent headers rotated across requests
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

/// Configuration for the WebDriver-backed fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebDriverFetcherConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Timeout for loading one page, in seconds
    #[serde(default = "default_webdriver_timeout_secs")]
    pub timeout_secs: u64,
}

/// Enum containing all fetcher configuration types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FetcherConfig {
    /// Plain HTTP requests
    Http(HttpFetcherConfig),

    /// Pages rendered by a browser through WebDriver
    WebDriver(WebDriverFetcherConfig),
}

impl Default for FetcherConfig {
    fn default() -> Self {
        FetcherConfig::Http(HttpFetcherConfig::default())
    }
}

/// Configuration for a scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// How the next page is found
    #[serde(default)]
    pub pagination: PaginationKind,

    /// Pause between page fetches, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Upper bound on pages visited (unbounded if None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,

    /// How pages are fetched
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Directory receiving one sub-folder per host (platform default if None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_root: Option<PathBuf>,

    /// User folder receiving "Website Data" when no output root is set
    #[serde(default)]
    pub output_location: OutputLocation,

    /// Format of the exported table
    #[serde(default)]
    pub format: ExportFormat,

    /// Candidate and field patterns
    #[serde(default)]
    pub heuristics: HeuristicConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            pagination: PaginationKind::default(),
            delay_ms: default_delay_ms(),
            max_pages: None,
            fetcher: FetcherConfig::default(),
            output_root: None,
            output_location: OutputLocation::default(),
            format: ExportFormat::default(),
            heuristics: HeuristicConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScrapeError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ScrapeError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.apply_env();
        Ok(config)
    }

    /// Override the WebDriver URL with the WEBDRIVER_URL environment variable if set
    pub fn apply_env(&mut self) {
        if let FetcherConfig::WebDriver(web_config) = &mut self.fetcher {
            if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
                if !webdriver_url.is_empty() {
                    web_config.webdriver_url = webdriver_url;
                }
            }
        }
    }
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            user_agents: default_user_agents(),
        }
    }
}

impl Default for WebDriverFetcherConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            timeout_secs: default_webdriver_timeout_secs(),
        }
    }
}

/// Default pause between pages
fn default_delay_ms() -> u64 {
    2000
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

/// Desktop and mobile agents rotated to look less like a bot
fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) AppleWebKit/602.3.12 (KHTML, like Gecko) Version/10.1.2 Safari/603.3.8",
        "Mozilla/5.0 (iPhone; CPU iPhone OS 10_3 like Mac OS X) AppleWebKit/602.1.50 (KHTML, like Gecko) Version/10.0 Mobile/14E5239e Safari/602.1",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:54.0) Gecko/20100101 Firefox/54.0",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_webdriver_timeout_secs() -> u64 {
    45
}
