//! # BRVM Report Watch
//!
//! Batch discovery of the financial reports published by BRVM-listed
//! companies. One run crawls the exchange's paginated report listing,
//! attributes each document to a tracked company, infers a usable date
//! from the free-form French titles, filters the candidates to a
//! reporting window, and writes a JSON snapshot for downstream PDF
//! analysis.
//!
//! ## Usage
//!
//! ```sh
//! brvm_report_watch -o ./snapshots
//! ```
//!
//! ## Architecture
//!
//! The run is a strictly sequential pipeline:
//! 1. **Registry**: load the immutable tracked-company set, optionally
//!    narrowed to a subset of symbols
//! 2. **Listing crawl**: walk the paginated listing, resolving row names
//!    to symbols
//! 3. **Company scrape**: visit each company page and collect dated,
//!    URL-deduplicated report candidates
//! 4. **Relevance filter**: apply the date-window/keyword rules
//! 5. **Snapshot**: write the per-company JSON registry
//!
//! A single fetcher session (headless Chrome by default) is reused for the
//! whole crawl, with a politeness delay between page visits. Any single
//! page failure is logged and skipped; only an empty company registry
//! aborts the run.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

mod cli;
mod dates;
mod fetch;
mod filter;
mod models;
mod outputs;
mod registry;
mod scrape;
mod text;

use cli::Cli;
use fetch::{AnyFetcher, ChromeFetcher, HttpFetcher};
use filter::{RelevanceRules, select_relevant};
use models::ReportRegistry;
use outputs::json::{build_snapshot, write_snapshot};
use registry::CompanyRegistry;
use scrape::company::scrape_company;
use scrape::listing::{CrawlOptions, crawl_listing};

/// Markup that signals a listing page has finished rendering.
const READY_SELECTOR: &str = "div.views-row";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("brvm_report_watch starting up");

    let args = Cli::parse();
    debug!(?args.listing_url, ?args.output_dir, ?args.only, "Parsed CLI arguments");

    // --- Company registry (loaded once, then only narrowed) ---
    let companies = match &args.companies {
        Some(path) => {
            let yaml = tokio::fs::read_to_string(path).await?;
            info!(path = %path, "Loaded companies file");
            CompanyRegistry::from_yaml(&yaml)?
        }
        None => CompanyRegistry::bundled()?,
    };
    let companies = if args.only.is_empty() {
        companies
    } else {
        companies.restrict_to(&args.only)
    };
    if companies.is_empty() {
        error!("No companies to track after narrowing; nothing to discover");
        return Err("no companies to track".into());
    }
    info!(count = companies.len(), "Tracking companies");

    let page_timeout = Duration::from_secs(args.page_timeout_secs);
    let page_delay = Duration::from_millis(args.delay_ms);

    // --- Fetcher session, reused across the entire crawl ---
    let fetcher = if args.no_browser {
        info!("Using plain HTTP fetcher");
        AnyFetcher::Http(HttpFetcher::new(page_timeout)?)
    } else {
        let (chrome, _driver) = ChromeFetcher::launch(READY_SELECTOR, page_timeout).await?;
        AnyFetcher::Chrome(chrome)
    };

    // --- Listing crawl ---
    let options = CrawlOptions {
        max_pages: args.max_pages,
        page_delay,
    };
    let leads = crawl_listing(&fetcher, &companies, &args.listing_url, &options).await?;
    info!(count = leads.len(), "Company pages discovered on listing");

    // --- Per-company scrape ---
    let origin = Url::parse(&args.listing_url)?.join("/")?;
    let mut reports = ReportRegistry::new();
    for (i, lead) in leads.iter().enumerate() {
        if i > 0 {
            sleep(page_delay).await;
        }
        scrape_company(&fetcher, lead, &origin, &mut reports).await;
    }
    info!(
        total = reports.total(),
        companies_with_reports = reports.company_count(),
        "Report discovery completed"
    );

    // --- Relevance filter ---
    let (older_start, newer_start) = args.window();
    info!(%older_start, %newer_start, keywords = ?args.keywords, top = args.top, "Applying relevance rules");
    let rules = RelevanceRules::new(older_start, newer_start, &args.keywords, args.top);
    let selected = select_relevant(&reports, &companies, &rules);

    for company in companies.companies() {
        if selected.get(&company.symbol).is_none_or(Vec::is_empty) {
            warn!(symbol = %company.symbol, name = %company.name, "No relevant report found");
        }
    }

    // --- Snapshot ---
    let snapshot = build_snapshot(&companies, &selected);
    write_snapshot(&snapshot, &args.output_dir).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}
