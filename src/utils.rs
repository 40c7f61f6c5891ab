use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Name of the folder collecting all scraped sites
pub const DATA_FOLDER: &str = "Website Data";

/// Delay before retry number `attempt` (0-based), doubling each time
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

/// Convert a string to a sanitized filename
pub fn sanitize_filename(name: &str) -> String {
    // Replace characters that are invalid in file names on common platforms
    let name = name.replace(['/', '\\', ':', '?', '&', '=', '#', '%', '*', '"', '<', '>', '|'], "_");

    // Limit filename length
    if name.len() > 100 {
        let mut end = 100;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        name[..end].to_string()
    } else {
        name
    }
}

/// Folder name for a seed URL: its network location without scheme or path
pub fn host_folder_name(url: &Url) -> String {
    let host = url.host_str().unwrap_or("unknown-host");
    let netloc = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    sanitize_filename(&netloc)
}

/// User folder that receives the "Website Data" export folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputLocation {
    #[default]
    Desktop,
    Documents,
}

/// Default export root: a "Website Data" folder in the chosen user folder
pub fn default_output_root(location: OutputLocation) -> PathBuf {
    let (dir, fallback) = match location {
        OutputLocation::Desktop => (dirs::desktop_dir(), "Desktop"),
        OutputLocation::Documents => (dirs::document_dir(), "Documents"),
    };
    dir.or_else(|| dirs::home_dir().map(|home| home.join(fallback)))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_FOLDER)
}
