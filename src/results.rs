use serde::{Deserialize, Serialize};
use url::Url;

/// Placeholder used for every field that could not be resolved
pub const SENTINEL: &str = "N/A";

/// One scraped product, derived from a single candidate element.
///
/// Fields are never empty: anything unresolved holds [`SENTINEL`], so a row
/// always has all five columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Product Name")]
    pub name: String,

    #[serde(rename = "Price")]
    pub price: String,

    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "Model Number")]
    pub model_number: String,

    #[serde(rename = "Image URLs")]
    pub image_url: String,
}

impl ProductRecord {
    /// Create a record, replacing blank values with the sentinel
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        description: impl Into<String>,
        model_number: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: or_sentinel(name.into()),
            price: or_sentinel(price.into()),
            description: or_sentinel(description.into()),
            model_number: or_sentinel(model_number.into()),
            image_url: or_sentinel(image_url.into()),
        }
    }

    /// The all-sentinel row written when a run found nothing
    pub fn placeholder() -> Self {
        Self::new(SENTINEL, SENTINEL, SENTINEL, SENTINEL, SENTINEL)
    }

    /// Column values in export order
    pub fn as_row(&self) -> [&str; 5] {
        [
            self.name.as_str(),
            self.price.as_str(),
            self.description.as_str(),
            self.model_number.as_str(),
            self.image_url.as_str(),
        ]
    }
}

fn or_sentinel(value: String) -> String {
    if value.trim().is_empty() {
        SENTINEL.to_string()
    } else {
        value
    }
}

/// State of one scrape run.
///
/// Owned by the driver loop and handed to the exporter once traversal ends.
#[derive(Debug, Clone)]
pub struct ScrapeSession {
    /// URL the run started from
    pub seed: Url,

    /// Records in discovery order: page order, then document order
    pub rows: Vec<ProductRecord>,

    /// Page number of the next page to visit, starting at 1
    pub current_page: usize,
}

impl ScrapeSession {
    pub fn new(seed: Url) -> Self {
        Self {
            seed,
            rows: Vec::new(),
            current_page: 1,
        }
    }

    /// Append the records of a page that yielded candidates and advance the counter
    pub fn record_page(&mut self, records: Vec<ProductRecord>) {
        self.rows.extend(records);
        self.current_page += 1;
    }

    /// Number of pages that contributed records
    pub fn pages_scraped(&self) -> usize {
        self.current_page - 1
    }
}
