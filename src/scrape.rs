use crate::crawlers::Fetcher;
use crate::error::ScrapeError;
use crate::heuristics::Heuristics;
use crate::pagination::{PageState, PaginationPolicy};
use crate::parsers::html::extract_page;
use crate::results::ScrapeSession;
use std::time::Duration;
use url::Url;

/// Knobs for the pagination loop
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Pause before every page after the first
    pub delay: Duration,
    /// Stop after this many pages (unbounded if None)
    pub max_pages: Option<usize>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(2),
            max_pages: None,
        }
    }
}

/// Summary of one visited page that yielded products
#[derive(Debug, Clone)]
pub struct PageReport {
    pub page_number: usize,
    pub url: Url,
    pub products: usize,
}

/// Runs the pagination loop from `seed` and returns the filled session.
///
/// Pages are fetched strictly one after another. The loop ends when a page
/// has no candidates, the policy has no next request, a fetch fails, or the
/// page cap is hit. A fetch failure on the first page is returned as an
/// error; later failures end the run and keep the rows gathered so far.
pub async fn run<F>(
    seed: Url,
    fetcher: &dyn Fetcher,
    policy: &mut dyn PaginationPolicy,
    heuristics: &Heuristics,
    options: &ScrapeOptions,
    mut on_page: F,
) -> Result<ScrapeSession, ScrapeError>
where
    F: FnMut(&PageReport),
{
    let mut session = ScrapeSession::new(seed);
    let mut next = Some(policy.first_request(&session.seed));

    while let Some(url) = next.take() {
        let page_number = session.current_page;

        if options.max_pages.is_some_and(|max| page_number > max) {
            ::log::info!("Reached page limit of {}, stopping", page_number - 1);
            break;
        }

        // Be polite to the target server
        if page_number > 1 && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }

        ::log::info!("Scraping page {} - {}", page_number, url);

        let fetched = match fetcher.fetch(&url).await {
            Ok(fetched) => fetched,
            Err(e) if page_number == 1 => {
                ::log::error!("Failed to retrieve content from {}: {}", url, e);
                return Err(e);
            }
            Err(e) => {
                ::log::error!("Failed to retrieve content from {}: {}", url, e);
                break;
            }
        };

        let page = extract_page(&fetched.body, &fetched.url, heuristics);
        let products = page.records.len();

        if !page.has_candidates() {
            ::log::info!("No products found on page {}", page_number);
            break;
        }

        next = policy.next_request(&PageState {
            seed: &session.seed,
            url: &fetched.url,
            page_number,
            candidates: products,
            next_link: page.next_link.as_ref(),
        });

        session.record_page(page.records);
        ::log::info!("Page {} scraped. {} products found.", page_number, products);
        on_page(&PageReport {
            page_number,
            url: fetched.url,
            products,
        });
    }

    ::log::info!(
        "Completed scraping. Total pages scraped: {}",
        session.pages_scraped()
    );
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawlers::FetchedPage;
    use crate::pagination::{LinkFollowing, ParamIncrement};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages keyed by URL and records every request
    struct CannedFetcher {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl CannedFetcher {
        fn new(pages: &[(&str, String)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.clone()))
                    .collect(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for CannedFetcher {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, ScrapeError> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.pages.get(url.as_str()) {
                Some(body) => Ok(FetchedPage {
                    url: url.clone(),
                    body: body.clone(),
                }),
                None => Err(ScrapeError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    fn products(names: &[&str], next: Option<&str>) -> String {
        let mut html = String::from("<html><body>");
        for name in names {
            html.push_str(&format!(
                r#"<div class="product"><h2 class="name">{}</h2></div>"#,
                name
            ));
        }
        if let Some(href) = next {
            html.push_str(&format!(r#"<a class="next" href="{}">Next</a>"#, href));
        }
        html.push_str("</body></html>");
        html
    }

    fn no_delay() -> ScrapeOptions {
        ScrapeOptions {
            delay: Duration::ZERO,
            max_pages: None,
        }
    }

    #[tokio::test]
    async fn test_param_increment_stops_at_empty_page() {
        let fetcher = CannedFetcher::new(&[
            ("https://shop.example/cat?page=1", products(&["A", "B", "C"], None)),
            ("https://shop.example/cat?page=2", products(&[], None)),
        ]);
        let seed = Url::parse("https://shop.example/cat").unwrap();
        let mut reports = Vec::new();

        let session = run(
            seed,
            &fetcher,
            &mut ParamIncrement::new(),
            &Heuristics::default(),
            &no_delay(),
            |report| reports.push(report.products),
        )
        .await
        .unwrap();

        assert_eq!(session.rows.len(), 3);
        assert_eq!(session.current_page, 2);
        assert_eq!(session.pages_scraped(), 1);
        assert_eq!(reports, vec![3]);
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_link_following_preserves_page_order() {
        let fetcher = CannedFetcher::new(&[
            ("https://shop.example/cat", products(&["A", "B"], Some("/cat/2"))),
            ("https://shop.example/cat/2", products(&["C"], Some("/cat/3"))),
            ("https://shop.example/cat/3", products(&["D"], None)),
        ]);
        let seed = Url::parse("https://shop.example/cat").unwrap();

        let session = run(
            seed,
            &fetcher,
            &mut LinkFollowing::new(),
            &Heuristics::default(),
            &no_delay(),
            |_| {},
        )
        .await
        .unwrap();

        let names = session.rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["A", "B", "C", "D"]);
        assert_eq!(session.pages_scraped(), 3);
    }

    #[tokio::test]
    async fn test_later_fetch_failure_keeps_rows() {
        let fetcher = CannedFetcher::new(&[(
            "https://shop.example/cat",
            products(&["A"], Some("/gone")),
        )]);
        let seed = Url::parse("https://shop.example/cat").unwrap();

        let session = run(
            seed,
            &fetcher,
            &mut LinkFollowing::new(),
            &Heuristics::default(),
            &no_delay(),
            |_| {},
        )
        .await
        .unwrap();

        assert_eq!(session.rows.len(), 1);
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_first_page_failure_is_an_error() {
        let fetcher = CannedFetcher::new(&[]);
        let seed = Url::parse("https://shop.example/cat").unwrap();

        let result = run(
            seed,
            &fetcher,
            &mut LinkFollowing::new(),
            &Heuristics::default(),
            &no_delay(),
            |_| {},
        )
        .await;

        assert!(matches!(result, Err(ScrapeError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_empty_first_page_yields_empty_session() {
        let fetcher = CannedFetcher::new(&[("https://shop.example/cat", products(&[], Some("/2")))]);
        let seed = Url::parse("https://shop.example/cat").unwrap();

        let session = run(
            seed,
            &fetcher,
            &mut LinkFollowing::new(),
            &Heuristics::default(),
            &no_delay(),
            |_| {},
        )
        .await
        .unwrap();

        assert!(session.rows.is_empty());
        assert_eq!(session.pages_scraped(), 0);
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_max_pages_caps_the_run() {
        let fetcher = CannedFetcher::new(&[
            ("https://shop.example/cat?page=1", products(&["A"], None)),
            ("https://shop.example/cat?page=2", products(&["B"], None)),
            ("https://shop.example/cat?page=3", products(&["C"], None)),
        ]);
        let seed = Url::parse("https://shop.example/cat").unwrap();
        let options = ScrapeOptions {
            delay: Duration::ZERO,
            max_pages: Some(2),
        };

        let session = run(
            seed,
            &fetcher,
            &mut ParamIncrement::new(),
            &Heuristics::default(),
            &options,
            |_| {},
        )
        .await
        .unwrap();

        assert_eq!(session.rows.len(), 2);
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_applies_between_pages() {
        let fetcher = CannedFetcher::new(&[
            ("https://shop.example/cat?page=1", products(&["A"], None)),
            ("https://shop.example/cat?page=2", products(&["B"], None)),
            ("https://shop.example/cat?page=3", products(&[], None)),
        ]);
        let seed = Url::parse("https://shop.example/cat").unwrap();
        let start = tokio::time::Instant::now();

        run(
            seed,
            &fetcher,
            &mut ParamIncrement::new(),
            &Heuristics::default(),
            &ScrapeOptions::default(),
            |_| {},
        )
        .await
        .unwrap();

        assert!(start.elapsed() >= Duration::from_secs(4));
    }
}
