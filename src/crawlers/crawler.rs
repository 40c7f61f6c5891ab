use crate::error::ScrapeError;
use async_trait::async_trait;
use url::Url;

/// Raw content of a fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects; relative links resolve against it
    pub url: Url,
    /// Page source
    pub body: String,
}

/// Base trait for page fetchers
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a single page
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ScrapeError>;

    /// Release any held resources once the run is over
    async fn shutdown(&self) {}
}
