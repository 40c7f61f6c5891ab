use crate::error::ScrapeError;
use crate::results::{ProductRecord, ScrapeSession};
use crate::utils::{OutputLocation, default_output_root, host_folder_name};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Base name of the exported table, without extension
pub const EXPORT_FILE_STEM: &str = "scraped_product_data";

/// Column headers, in export order
pub const HEADERS: [&str; 5] = [
    "Product Name",
    "Price",
    "Description",
    "Model Number",
    "Image URLs",
];

/// Tabular formats the exporter can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
        }
    }

    pub fn delimiter(self) -> u8 {
        match self {
            ExportFormat::Csv => b',',
            ExportFormat::Tsv => b'\t',
        }
    }
}

/// Where and how to write the export
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory receiving one sub-folder per host
    pub output_root: PathBuf,
    pub format: ExportFormat,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_root: default_output_root(OutputLocation::default()),
            format: ExportFormat::default(),
        }
    }
}

impl ExportOptions {
    /// `<output_root>/<host>/scraped_product_data.<ext>` for the session's seed
    pub fn out_path(&self, session: &ScrapeSession) -> PathBuf {
        self.output_root
            .join(host_folder_name(&session.seed))
            .join(format!("{}.{}", EXPORT_FILE_STEM, self.format.ext()))
    }
}

/// Writes the session's rows to disk and returns the path written.
///
/// A session without rows still produces one all-"N/A" row under the headers.
pub fn export(session: &ScrapeSession, options: &ExportOptions) -> Result<PathBuf, ScrapeError> {
    let path = options.out_path(session);

    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    // Headers come from the record's serde names on the first row
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.format.delimiter())
        .from_path(&path)?;

    let placeholder = [ProductRecord::placeholder()];
    let rows = if session.rows.is_empty() {
        ::log::warn!("No products scraped; writing a placeholder row");
        &placeholder[..]
    } else {
        &session.rows[..]
    };

    for record in rows {
        writer.serialize(record)?;
    }
    writer.flush()?;

    ::log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(path)
}

/// Ensure a directory exists (mkdir -p)
fn ensure_directory(dir: &Path) -> Result<(), ScrapeError> {
    if dir.as_os_str().is_empty() || dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::SENTINEL;
    use url::Url;

    fn session(rows: Vec<ProductRecord>) -> ScrapeSession {
        let mut session = ScrapeSession::new(Url::parse("https://shop.example/cat").unwrap());
        session.rows = rows;
        session
    }

    fn read_rows(path: &Path, delimiter: u8) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_path(path)
            .unwrap()
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_export_path_uses_host_folder() {
        let options = ExportOptions {
            output_root: PathBuf::from("/data"),
            format: ExportFormat::Csv,
        };
        assert_eq!(
            options.out_path(&session(vec![])),
            PathBuf::from("/data/shop.example/scraped_product_data.csv")
        );
    }

    #[test]
    fn test_export_writes_headers_and_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            output_root: dir.path().to_path_buf(),
            format: ExportFormat::Csv,
        };
        let rows = vec![
            ProductRecord::new("Widget, large", "$9.99", "N/A", "W-1", "https://shop.example/w.jpg"),
            ProductRecord::new("Gadget", "$1", "Says \"hi\"", "N/A", "N/A"),
        ];

        let path = export(&session(rows), &options).unwrap();
        let written = read_rows(&path, b',');

        assert_eq!(written.len(), 3);
        assert_eq!(written[0], HEADERS);
        assert_eq!(
            written[1],
            ["Widget, large", "$9.99", "N/A", "W-1", "https://shop.example/w.jpg"]
        );
        assert_eq!(written[2], ["Gadget", "$1", "Says \"hi\"", "N/A", "N/A"]);
    }

    #[test]
    fn test_empty_session_writes_placeholder_row() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            output_root: dir.path().to_path_buf(),
            format: ExportFormat::Tsv,
        };

        let path = export(&session(vec![]), &options).unwrap();
        assert!(path.ends_with("shop.example/scraped_product_data.tsv"));

        let written = read_rows(&path, b'\t');
        assert_eq!(written.len(), 2);
        assert_eq!(written[1], [SENTINEL; 5]);
    }

    #[test]
    fn test_unwritable_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();
        let options = ExportOptions {
            output_root: blocker,
            format: ExportFormat::Csv,
        };

        assert!(export(&session(vec![]), &options).is_err());
    }
}
