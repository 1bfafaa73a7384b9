//! Command-line interface definitions.
//!
//! All knobs of a discovery run live here: the listing URL, the tracked
//! company set and its narrowing, the relevance window, and the crawl
//! pacing. Defaults match a routine "what came out since last year" run.

use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;

/// Command-line arguments for the BRVM report discovery run.
///
/// # Examples
///
/// ```sh
/// # Routine run with the bundled registry
/// brvm_report_watch -o ./snapshots
///
/// # Track two companies only, explicit window
/// brvm_report_watch -o ./snapshots --only SNTS,BOAC \
///     --older-start 2024-01-01 --newer-start 2025-01-01
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Listing URL to crawl
    #[arg(
        long,
        default_value = "https://www.brvm.org/fr/rapports-des-societes-cotees/all"
    )]
    pub listing_url: String,

    /// Companies YAML file (bundled BRVM registry when omitted)
    #[arg(short, long)]
    pub companies: Option<String>,

    /// Narrow tracking to these symbols (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Output directory for the JSON snapshot
    #[arg(short, long)]
    pub output_dir: String,

    /// Start of the keyword-gated window, YYYY-MM-DD (default: Jan 1 of last year)
    #[arg(long)]
    pub older_start: Option<NaiveDate>,

    /// Start of the keep-everything window, YYYY-MM-DD (default: Jan 1 of this year)
    #[arg(long)]
    pub newer_start: Option<NaiveDate>,

    /// Keywords required on in-window titles (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "états financiers")]
    pub keywords: Vec<String>,

    /// Maximum listing pages to walk
    #[arg(long, default_value_t = 50)]
    pub max_pages: usize,

    /// Per-page fetch timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub page_timeout_secs: u64,

    /// Politeness delay between page visits in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,

    /// Per-company cap on selected reports
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Fetch with plain HTTP instead of headless Chrome
    #[arg(long)]
    pub no_browser: bool,
}

impl Cli {
    /// The (older_start, newer_start) window, with year-based defaults.
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        let this_year = Local::now().year();
        let older = self
            .older_start
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(this_year - 1, 1, 1).unwrap());
        let newer = self
            .newer_start
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(this_year, 1, 1).unwrap());
        (older, newer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["brvm_report_watch", "-o", "./snapshots"]);
        assert_eq!(cli.output_dir, "./snapshots");
        assert!(cli.listing_url.contains("brvm.org"));
        assert_eq!(cli.max_pages, 50);
        assert_eq!(cli.top, 5);
        assert_eq!(cli.keywords, vec!["états financiers"]);
        assert!(cli.only.is_empty());
        assert!(!cli.no_browser);
    }

    #[test]
    fn test_cli_narrowing_list() {
        let cli = Cli::parse_from([
            "brvm_report_watch",
            "-o",
            "./snapshots",
            "--only",
            "SNTS,BOAC",
        ]);
        assert_eq!(cli.only, vec!["SNTS", "BOAC"]);
    }

    #[test]
    fn test_cli_explicit_window() {
        let cli = Cli::parse_from([
            "brvm_report_watch",
            "-o",
            "./snapshots",
            "--older-start",
            "2024-01-01",
            "--newer-start",
            "2025-01-01",
        ]);
        let (older, newer) = cli.window();
        assert_eq!(older, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(newer, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_cli_default_window_spans_two_years() {
        let cli = Cli::parse_from(["brvm_report_watch", "-o", "./snapshots"]);
        let (older, newer) = cli.window();
        assert_eq!(newer.year() - older.year(), 1);
        assert_eq!((older.month(), older.day()), (1, 1));
    }
}
