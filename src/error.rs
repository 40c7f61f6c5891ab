use thiserror::Error;

/// Errors raised while fetching, configuring or exporting a scrape run.
///
/// Missing fields and empty pages are not errors; they are handled with the
/// sentinel value and normal termination respectively.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("giving up on {url} after {attempts} attempts: {source}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        source: Box<ScrapeError>,
    },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("webdriver error: {0}")]
    WebDriver(String),

    #[error("failed to write export: {0}")]
    Export(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid heuristic pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ScrapeError {
    pub fn invalid_url(url: &str, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            source,
        }
    }

    /// Whether another attempt at the same request could succeed.
    ///
    /// Requests reqwest refuses to build (bad scheme, bad header) never can.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Fetch { source, .. } => !source.is_builder(),
            Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
