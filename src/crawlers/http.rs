use crate::config::HttpFetcherConfig;
use crate::crawlers::crawler::{FetchedPage, Fetcher};
use crate::error::ScrapeError;
use crate::utils::backoff_delay;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

/// Fetches pages with plain HTTP GET requests
pub struct HttpFetcher {
    client: Client,
    user_agents: Vec<String>,
    next_agent: AtomicUsize,
    max_retries: u32,
    retry_backoff: Duration,
}

impl HttpFetcher {
    pub fn new(config: &HttpFetcherConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ScrapeError::Client)?;

        Ok(Self {
            client,
            user_agents: config.user_agents.clone(),
            next_agent: AtomicUsize::new(0),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    /// Picks the next User-Agent in rotation
    fn user_agent(&self) -> Option<&str> {
        if self.user_agents.is_empty() {
            return None;
        }
        let idx = self.next_agent.fetch_add(1, Ordering::Relaxed) % self.user_agents.len();
        Some(&self.user_agents[idx])
    }

    /// Performs a single request attempt
    async fn fetch_once(&self, url: &Url) -> Result<FetchedPage, ScrapeError> {
        let mut request = self.client.get(url.clone());
        if let Some(agent) = self.user_agent() {
            request = request.header(USER_AGENT, agent);
        }

        let response = request.send().await.map_err(|source| {
            if source.is_timeout() {
                ScrapeError::Timeout {
                    url: url.to_string(),
                }
            } else {
                ScrapeError::Fetch {
                    url: url.to_string(),
                    source,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|source| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchedPage {
            url: final_url,
            body,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a URL, retrying transient failures with exponential backoff
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ScrapeError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(page) => {
                    ::log::debug!("Fetched {} ({} bytes)", page.url, page.body.len());
                    return Ok(page);
                }
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = backoff_delay(self.retry_backoff, attempt);
                    ::log::warn!(
                        "Request to {} failed: {}. Retrying in {:?} (attempt {}/{})",
                        url,
                        e,
                        delay,
                        attempt + 1,
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) if e.is_transient() && self.max_retries > 0 => {
                    ::log::error!("Giving up on {}: {}", url, e);
                    return Err(ScrapeError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: attempt + 1,
                        source: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(max_retries: u32) -> HttpFetcherConfig {
        HttpFetcherConfig {
            timeout_secs: 5,
            max_retries,
            retry_backoff_ms: 1,
            user_agents: vec!["agent-a".to_string(), "agent-b".to_string()],
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&config(0)).unwrap();
        let url = Url::parse(&format!("{}/cat", server.uri())).unwrap();
        let page = fetcher.fetch(&url).await.unwrap();

        assert_eq!(page.body, "<p>hi</p>");
        assert_eq!(page.url, url);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&config(3)).unwrap();
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();

        assert!(matches!(err, ScrapeError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_server_errors_are_retried_then_given_up() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&config(2)).unwrap();
        let url = Url::parse(&format!("{}/busy", server.uri())).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();

        match err {
            ScrapeError::RetriesExhausted {
                attempts, source, ..
            } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*source, ScrapeError::Status { status: 503, .. }));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unbuildable_request_is_not_retried() {
        let fetcher = HttpFetcher::new(&config(2)).unwrap();
        let url = Url::parse("javascript:void(0)").unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();

        assert!(matches!(err, ScrapeError::Fetch { .. }));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_user_agents_rotate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "agent-a"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(header("user-agent", "agent-b"))
            .respond_with(ResponseTemplate::new(200).set_body_string("b"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&config(0)).unwrap();
        let url = Url::parse(&server.uri()).unwrap();

        assert_eq!(fetcher.fetch(&url).await.unwrap().body, "a");
        assert_eq!(fetcher.fetch(&url).await.unwrap().body, "b");
        assert_eq!(fetcher.fetch(&url).await.unwrap().body, "a");
    }
}
