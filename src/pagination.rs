use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// What the driver knows about the page it just processed
#[derive(Debug, Clone, Copy)]
pub struct PageState<'a> {
    /// URL the run started from
    pub seed: &'a Url,
    /// Final URL of the page just processed
    pub url: &'a Url,
    /// 1-based number of the page just processed
    pub page_number: usize,
    /// Number of candidate elements found on it
    pub candidates: usize,
    /// Its "next page" link, if any
    pub next_link: Option<&'a Url>,
}

/// Strategy for discovering or constructing the next page to fetch
pub trait PaginationPolicy: Send {
    /// URL of the first page to fetch
    fn first_request(&mut self, seed: &Url) -> Url;

    /// URL of the next page, or None to stop
    fn next_request(&mut self, state: &PageState<'_>) -> Option<Url>;
}

/// Pagination policy selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaginationKind {
    /// Follow the page's "next" link
    #[default]
    Link,
    /// Increment a `page` query parameter on the seed URL
    Param,
}

impl PaginationKind {
    pub fn into_policy(self) -> Box<dyn PaginationPolicy> {
        match self {
            PaginationKind::Link => Box::new(LinkFollowing::new()),
            PaginationKind::Param => Box::new(ParamIncrement::new()),
        }
    }
}

/// Follows explicit "next page" links until a page has none
#[derive(Debug, Default)]
pub struct LinkFollowing {
    visited: HashSet<String>,
}

impl LinkFollowing {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PaginationPolicy for LinkFollowing {
    fn first_request(&mut self, seed: &Url) -> Url {
        self.visited.insert(normalize(seed));
        seed.clone()
    }

    fn next_request(&mut self, state: &PageState<'_>) -> Option<Url> {
        if state.candidates == 0 {
            return None;
        }
        self.visited.insert(normalize(state.url));

        let next = state.next_link?;
        if !self.visited.insert(normalize(next)) {
            ::log::warn!("Next link {} was already visited, stopping", next);
            return None;
        }
        Some(next.clone())
    }
}

/// Builds successor URLs by setting `page=N` on the seed URL
#[derive(Debug)]
pub struct ParamIncrement {
    param: String,
}

impl Default for ParamIncrement {
    fn default() -> Self {
        Self {
            param: "page".to_string(),
        }
    }
}

impl ParamIncrement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different query parameter name
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }
}

impl PaginationPolicy for ParamIncrement {
    fn first_request(&mut self, seed: &Url) -> Url {
        with_page_param(seed, &self.param, 1)
    }

    fn next_request(&mut self, state: &PageState<'_>) -> Option<Url> {
        if state.candidates == 0 {
            return None;
        }
        Some(with_page_param(state.seed, &self.param, state.page_number + 1))
    }
}

/// Returns `url` with `param` set to `page`, replacing any existing value
pub fn with_page_param(url: &Url, param: &str, page: usize) -> Url {
    let kept = url
        .query_pairs()
        .filter(|(key, _)| key != param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect::<Vec<_>>();

    let mut next = url.clone();
    {
        let mut pairs = next.query_pairs_mut();
        pairs.clear();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(param, &page.to_string());
    }
    next
}

fn normalize(url: &Url) -> String {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized.to_string()
}
