use clap::Parser;
use product_scrape::Scrape;
use product_scrape::config::ScraperConfig;
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_file) {
        eprintln!("Failed to open log file {}: {}", args.log_file.display(), e);
        return ExitCode::FAILURE;
    }

    let seed = match args.uri.clone() {
        Some(uri) => uri,
        None => match prompt_for_url() {
            Ok(uri) => uri,
            Err(e) => {
                ::log::error!("Failed to read URL: {}", e);
                eprintln!("Failed to read URL: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    match run(&args, &seed).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("Scrape failed: {}", e);
            eprintln!("Scrape failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, seed: &str) -> Result<(), product_scrape::ScrapeError> {
    let mut config = match &args.config {
        Some(path) => ScraperConfig::from_file(path)?,
        None => {
            let mut config = ScraperConfig::default();
            config.apply_env();
            config
        }
    };

    // Command-line flags take precedence over the file
    if let Some(pagination) = args.pagination {
        config.pagination = pagination.into();
    }
    if let Some(delay_ms) = args.delay_ms {
        config.delay_ms = delay_ms;
    }
    if let Some(max_pages) = args.max_pages {
        config.max_pages = Some(max_pages);
    }
    if let Some(root) = &args.output_root {
        config.output_root = Some(root.clone());
    }
    if let Some(location) = args.output_location {
        config.output_location = location.into();
    }
    if let Some(format) = args.format {
        config.format = format.into();
    }

    let scrape = Scrape::new(seed)?.with_config(config);
    ::log::info!("Starting scraper for URL: {}", scrape.seed());

    let start_time = std::time::Instant::now();
    let outcome = scrape
        .run(|report| {
            println!(
                "Page {} scraped. {} products found.",
                report.page_number, report.products
            );
        })
        .await?;

    println!(
        "Completed scraping. Total pages scraped: {}",
        outcome.session.pages_scraped()
    );
    println!(
        "\nProduct data successfully exported to {}",
        outcome.export_path.display()
    );
    ::log::info!(
        "Run finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Reads the seed URL as a single line from stdin
fn prompt_for_url() -> io::Result<String> {
    print!("Please enter the website URL to scrape: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Sends log records to an append-only file; RUST_LOG overrides the default level
fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
