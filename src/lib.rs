// Re-export modules
pub mod config;
pub mod crawlers;
pub mod error;
pub mod export;
pub mod heuristics;
pub mod pagination;
pub mod parsers;
pub mod results;
pub mod scrape;
pub mod utils;

// Re-export commonly used types for convenience
pub use error::ScrapeError;
pub use results::{ProductRecord, SENTINEL, ScrapeSession};
pub use scrape::PageReport;

use config::ScraperConfig;
use crawlers::Fetcher;
use export::{ExportFormat, ExportOptions};
use heuristics::Heuristics;
use pagination::{PaginationKind, PaginationPolicy};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Outcome of a completed run
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub session: ScrapeSession,
    /// File the rows were exported to
    pub export_path: PathBuf,
}

/// Main builder for a scrape run starting from one seed URL
pub struct Scrape {
    seed: Url,
    config: ScraperConfig,
    fetcher: Option<Box<dyn Fetcher>>,
    policy: Option<Box<dyn PaginationPolicy>>,
}

impl Scrape {
    /// Create a new Scrape builder for the given seed URL
    pub fn new(seed: &str) -> Result<Self, ScrapeError> {
        let seed = Url::parse(seed.trim()).map_err(|e| ScrapeError::invalid_url(seed, e))?;
        Ok(Self {
            seed,
            config: ScraperConfig::default(),
            fetcher: None,
            policy: None,
        })
    }

    /// Apply a configuration
    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, ScrapeError> {
        let config = ScraperConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Select the pagination policy by kind
    pub fn with_pagination(mut self, kind: PaginationKind) -> Self {
        self.config.pagination = kind;
        self
    }

    /// Use a custom pagination policy instead of a configured one
    pub fn with_policy(mut self, policy: Box<dyn PaginationPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Use a custom fetcher instead of the configured one
    pub fn with_fetcher(mut self, fetcher: Box<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Override the pause between pages
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.config.delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Stop after this many pages
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = Some(max_pages);
        self
    }

    /// Override the export root directory
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.output_root = Some(root.into());
        self
    }

    /// Choose the user folder used when no output root is set
    pub fn with_output_location(mut self, location: utils::OutputLocation) -> Self {
        self.config.output_location = location;
        self
    }

    /// Override the export format
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Traverse the listing and return the filled session without exporting
    pub async fn collect<F>(self, on_page: F) -> Result<ScrapeSession, ScrapeError>
    where
        F: FnMut(&PageReport),
    {
        let heuristics = Heuristics::new(&self.config.heuristics)?;
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => crawlers::from_config(&self.config.fetcher)?,
        };
        let mut policy = self
            .policy
            .unwrap_or_else(|| self.config.pagination.into_policy());
        let options = scrape::ScrapeOptions {
            delay: Duration::from_millis(self.config.delay_ms),
            max_pages: self.config.max_pages,
        };

        ::log::info!("Starting scrape of {}", self.seed);
        let result = scrape::run(
            self.seed,
            fetcher.as_ref(),
            policy.as_mut(),
            &heuristics,
            &options,
            on_page,
        )
        .await;
        fetcher.shutdown().await;
        result
    }

    /// Traverse the listing and export the rows once traversal ends
    pub async fn run<F>(self, on_page: F) -> Result<ScrapeOutcome, ScrapeError>
    where
        F: FnMut(&PageReport),
    {
        let export_options = ExportOptions {
            output_root: self
                .config
                .output_root
                .clone()
                .unwrap_or_else(|| utils::default_output_root(self.config.output_location)),
            format: self.config.format,
        };

        let session = self.collect(on_page).await?;
        let export_path = export::export(&session, &export_options)?;

        Ok(ScrapeOutcome {
            session,
            export_path,
        })
    }
}
