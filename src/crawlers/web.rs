use crate::config::WebDriverFetcherConfig;
use crate::crawlers::crawler::{FetchedPage, Fetcher};
use crate::error::ScrapeError;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use url::Url;

/// Common alternative WebDriver endpoints tried when the configured one is down
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Fetches pages through a browser driven over WebDriver.
///
/// Used for listings rendered client-side. The session is opened lazily on
/// the first fetch and closed by [`Fetcher::shutdown`].
pub struct WebDriverFetcher {
    webdriver_url: String,
    page_timeout: Duration,
    client: Mutex<Option<Client>>,
}

impl WebDriverFetcher {
    pub fn new(config: &WebDriverFetcherConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            page_timeout: Duration::from_secs(config.timeout_secs),
            client: Mutex::new(None),
        }
    }

    /// Navigates and reads the rendered source, bounded by the page timeout
    async fn load(&self, client: &Client, url: &Url) -> Result<FetchedPage, ScrapeError> {
        let result = timeout(self.page_timeout, async {
            client
                .goto(url.as_str())
                .await
                .map_err(|e| navigation_error(e, "accessing", url))?;
            let body = client
                .source()
                .await
                .map_err(|e| navigation_error(e, "getting source for", url))?;
            let final_url = client.current_url().await.unwrap_or_else(|_| url.clone());
            Ok::<_, ScrapeError>(FetchedPage {
                url: final_url,
                body,
            })
        })
        .await;

        match result {
            Ok(page) => page,
            Err(_) => {
                ::log::error!("Timeout scraping: {}", url);
                Err(ScrapeError::Timeout {
                    url: url.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl Fetcher for WebDriverFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ScrapeError> {
        let mut guard = self.client.lock().await;

        if guard.is_none() {
            *guard = Some(connect_to_webdriver(&self.webdriver_url).await?);
        }
        let Some(client) = guard.as_ref() else {
            return Err(ScrapeError::WebDriver("no WebDriver session".to_string()));
        };

        let result = self.load(client, url).await;
        match result {
            Err(ScrapeError::WebDriver(msg)) if msg.contains("Unable to find session") => {
                // Session died under us; reconnect once and retry
                ::log::warn!("Lost WebDriver session, attempting to reconnect");
                if let Some(stale) = guard.take() {
                    if let Err(e) = stale.close().await {
                        ::log::debug!("Closing stale WebDriver client failed: {}", e);
                    }
                }
                let client = connect_to_webdriver(&self.webdriver_url).await?;
                let page = self.load(&client, url).await;
                *guard = Some(client);
                page
            }
            other => other,
        }
    }

    async fn shutdown(&self) {
        if let Some(client) = self.client.lock().await.take() {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver client: {}", e);
            }
        }
    }
}

/// Connects to the WebDriver instance, falling back to common local endpoints
async fn connect_to_webdriver(webdriver_url: &str) -> Result<Client, ScrapeError> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    for url in FALLBACK_WEBDRIVER_URLS.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(ScrapeError::WebDriver(format!(
        "failed to connect to any WebDriver server (tried {})",
        webdriver_url
    )))
}

/// Converts a navigation or source error into a fetch error
fn navigation_error(error: fantoccini::error::CmdError, context: &str, url: &Url) -> ScrapeError {
    let message = error.to_string();
    if message.contains("Unable to find session") {
        ::log::warn!("Lost session while {} {}", context, url);
    } else {
        ::log::error!("Failed {} {}: {}", context, url, message);
    }
    ScrapeError::WebDriver(message)
}
