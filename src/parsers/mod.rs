pub mod html;
pub mod text;

#[cfg(test)]
mod tests;

use crate::results::ProductRecord;
use url::Url;

/// Result of extracting one listing page
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    /// One record per candidate element, in document order
    pub records: Vec<ProductRecord>,
    /// Absolute URL of the "next page" link, if the page has one
    pub next_link: Option<Url>,
}

impl ExtractedPage {
    /// Creates a new extraction result with the given records and next link
    pub fn new(records: Vec<ProductRecord>, next_link: Option<Url>) -> Self {
        Self { records, next_link }
    }

    /// Whether the page contained any candidate elements
    pub fn has_candidates(&self) -> bool {
        !self.records.is_empty()
    }
}
