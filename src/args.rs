use clap::{Parser, ValueEnum};
use product_scrape::export::ExportFormat;
use product_scrape::pagination::PaginationKind;
use product_scrape::utils::OutputLocation;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "product-scrape")]
#[command(about = "Scrapes product listings across pages and exports them as a table")]
#[command(version)]
pub struct Args {
    /// Seed URL to scrape (prompted for if omitted)
    pub uri: Option<String>,

    /// Pagination strategy
    #[arg(short, long, value_enum)]
    pub pagination: Option<PaginationArg>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Delay between pages in milliseconds
    #[arg(short, long)]
    pub delay_ms: Option<u64>,

    /// Maximum number of pages to visit
    #[arg(short, long)]
    pub max_pages: Option<usize>,

    /// Directory receiving one folder per scraped host
    #[arg(short, long)]
    pub output_root: Option<PathBuf>,

    /// User folder holding "Website Data" when no output root is given
    #[arg(long, value_enum)]
    pub output_location: Option<LocationArg>,

    /// Export format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Append-only log file
    #[arg(long, default_value = "scraper.log")]
    pub log_file: PathBuf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PaginationArg {
    /// Follow "next page" links
    Link,
    /// Increment the `page` query parameter
    Param,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LocationArg {
    Desktop,
    Documents,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Tsv,
}

impl From<PaginationArg> for PaginationKind {
    fn from(arg: PaginationArg) -> Self {
        match arg {
            PaginationArg::Link => PaginationKind::Link,
            PaginationArg::Param => PaginationKind::Param,
        }
    }
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Tsv => ExportFormat::Tsv,
        }
    }
}

impl From<LocationArg> for OutputLocation {
    fn from(arg: LocationArg) -> Self {
        match arg {
            LocationArg::Desktop => OutputLocation::Desktop,
            LocationArg::Documents => OutputLocation::Documents,
        }
    }
}
