use anyhow::Context;
use chrono::{Days, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use price_scraper::apis::{BooksCrawler, HttpbinProbe, Market, QuotesCrawler, SkyscannerClient};
use price_scraper::app::ports::PageFetcher;
use price_scraper::config::{Config, DEFAULT_CONFIG_PATH};
use price_scraper::constants::{
    DEFAULT_BOOK_PAGES, DEFAULT_DESTINATION, DEFAULT_ORIGIN, DEFAULT_QUOTE_PAGES,
};
use price_scraper::infra::{FetchMode, ReqwestFetcher};
use price_scraper::pipeline::compare_prices;
use price_scraper::storage::{write_json_atomic, BookArchive};
use price_scraper::types::parse_travel_date;
use price_scraper::web::{self, AppState, DashboardKind};
use price_scraper::{logging, observability, report};

#[derive(Parser)]
#[command(name = "price_scraper")]
#[command(about = "Quote, book, flight and hotel price scrapers with small dashboards")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Paginate quotes.toscrape.com and summarize what was found
    Quotes {
        #[arg(long, default_value_t = DEFAULT_QUOTE_PAGES)]
        max_pages: u32,
    },
    /// CSS selector demo on the quotes home page
    Selectors,
    /// Request/response probes against httpbin.org
    Httpbin,
    /// Fetches with browser-like headers
    Stealth,
    /// Track book prices: statistics, comparison with the last run, CSV and JSON output
    Books {
        #[arg(long, default_value_t = DEFAULT_BOOK_PAGES)]
        max_pages: u32,
        /// Overrides `[storage].data_dir`
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Scrape one Skyscanner route and date
    Flights {
        #[arg(long, default_value = DEFAULT_ORIGIN)]
        origin: String,
        #[arg(long, default_value = DEFAULT_DESTINATION)]
        destination: String,
        /// YYYY-MM-DD or YYMMDD; defaults to 90 days from today
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "skyscanner_results.json")]
        output: PathBuf,
    },
    /// Run one of the web dashboards
    Serve {
        #[arg(long, value_enum, default_value_t = DashboardKind::Flights)]
        dashboard: DashboardKind,
        /// Overrides `[server].port` and the dashboard default
        #[arg(long)]
        port: Option<u16>,
    },
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_travel_date(value).ok_or_else(|| format!("invalid date '{value}', expected YYYY-MM-DD or YYMMDD"))
}

fn plain_fetcher(config: &Config) -> anyhow::Result<Arc<dyn PageFetcher>> {
    Ok(Arc::new(ReqwestFetcher::from_config(&config.fetch)?))
}

fn stealth_fetcher(config: &Config) -> anyhow::Result<Arc<dyn PageFetcher>> {
    Ok(Arc::new(ReqwestFetcher::new(&config.fetch, FetchMode::Stealth)?))
}

async fn run_quotes(config: &Config, max_pages: u32) -> anyhow::Result<()> {
    let crawler = QuotesCrawler::new(plain_fetcher(config)?);
    let quotes = crawler.scrape(max_pages).await?;
    for quote in &quotes {
        println!("{}\n", report::quote_block(quote));
    }
    println!("{}", report::quote_summary(&quotes));
    Ok(())
}

/// Prints one demo section; a failed demo does not stop the ones after it.
fn stealth_section<T, E: std::fmt::Display>(
    title: &str,
    outcome: Result<T, E>,
    render: impl FnOnce(T) -> String,
) {
    if let Err(e) = &outcome {
        warn!(section = title, "Stealth demo failed: {}", e);
    }
    println!("{}", report::demo_section(title, outcome, render));
}

async fn run_stealth(config: &Config) -> anyhow::Result<()> {
    let fetcher = stealth_fetcher(config)?;
    let quotes = QuotesCrawler::new(fetcher.clone());
    let books = BooksCrawler::new(fetcher.clone());
    let httpbin = HttpbinProbe::new(fetcher);

    println!("{}", report::banner("STEALTH FETCH DEMO"));

    stealth_section("Basic Stealth Fetch", quotes.home().await, |(status, page)| {
        report::stealth_quotes(status, &page)
    });
    stealth_section("Browser Headers", books.preview(3).await, |(status, preview)| {
        report::stealth_books(status, &preview)
    });
    stealth_section("Wait for Element", quotes.home().await, |(status, page)| {
        report::element_wait(status, "div.quote", page.quotes.len())
    });
    stealth_section("Challenge Page", httpbin.html_heading().await, |heading| {
        report::heading_report(&heading)
    });
    Ok(())
}

async fn run_books(config: &Config, max_pages: u32, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let archive = BookArchive::new(data_dir.unwrap_or_else(|| config.storage.data_dir.clone()));
    let crawler = BooksCrawler::new(plain_fetcher(config)?);

    println!("{}", report::banner("BOOK PRICE TRACKER"));
    let books = crawler.scrape(max_pages).await?;
    println!("{}\n", report::book_statistics(&books));

    let previous = archive.load_previous()?;
    let comparison = compare_prices(&books, &previous);
    println!("{}\n", report::comparison_report(&comparison, previous.is_empty()));

    archive.save_csv(&books)?;
    archive.save_json(&books)?;
    println!("Saved {} books to {}", books.len(), archive.csv_path().display());
    println!("Saved latest prices to {}", archive.json_path().display());
    Ok(())
}

async fn run_flights(
    config: &Config,
    origin: &str,
    destination: &str,
    date: Option<NaiveDate>,
    output: &Path,
) -> anyhow::Result<()> {
    let date = date.unwrap_or_else(|| {
        let today = Local::now().date_naive();
        today.checked_add_days(Days::new(90)).unwrap_or(today)
    });
    let client = SkyscannerClient::new(stealth_fetcher(config)?, Market::Global);

    match client.search(origin, destination, date, &config.flights.cli_rules()).await? {
        Some(record) => {
            println!("{}", report::flight_report(&record));
            write_json_atomic(output, &record)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("\nResults saved to {}", output.display());
        }
        None => {
            warn!("No flight results for {} -> {} on {}", origin, destination, date);
            println!("Failed to fetch flight results.");
        }
    }
    Ok(())
}

async fn run_server(config: Config, kind: DashboardKind, port: Option<u16>) -> anyhow::Result<()> {
    let port = port
        .or((config.server.port != 0).then_some(config.server.port))
        .unwrap_or_else(|| kind.default_port());
    let host = config.server.host.clone();
    let fetcher = stealth_fetcher(&config)?;

    let mut state = AppState::new(kind, config, fetcher);
    match observability::install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Metrics disabled: {}", e),
    }

    info!("Starting {} dashboard", kind.label());
    web::serve(state, &host, port).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load_from(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Commands::Quotes { max_pages } => run_quotes(&config, max_pages).await?,
        Commands::Selectors => {
            let summary = QuotesCrawler::new(plain_fetcher(&config)?).selector_demo().await?;
            println!("{}", report::selector_demo(&summary));
        }
        Commands::Httpbin => {
            let probes = HttpbinProbe::new(plain_fetcher(&config)?).run().await?;
            println!("{}", report::httpbin_report(&probes));
        }
        Commands::Stealth => run_stealth(&config).await?,
        Commands::Books { max_pages, data_dir } => run_books(&config, max_pages, data_dir).await?,
        Commands::Flights {
            origin,
            destination,
            date,
            output,
        } => run_flights(&config, &origin, &destination, date, &output).await?,
        Commands::Serve { dashboard, port } => run_server(config, dashboard, port).await?,
    }
    Ok(())
}
