pub mod crawler;
pub mod http;
pub mod web;

pub use crawler::{FetchedPage, Fetcher};

use crate::config::FetcherConfig;
use crate::error::ScrapeError;

/// Builds the fetcher described by the configuration
pub fn from_config(config: &FetcherConfig) -> Result<Box<dyn Fetcher>, ScrapeError> {
    match config {
        FetcherConfig::Http(http_config) => Ok(Box::new(http::HttpFetcher::new(http_config)?)),
        FetcherConfig::WebDriver(web_config) => Ok(Box::new(web::WebDriverFetcher::new(web_config))),
    }
}
