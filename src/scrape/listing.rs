//! Paginated crawl of the company-listing pages.
//!
//! The crawler walks the listing one page at a time: fetch, extract rows,
//! follow the pager's "next" link. It terminates when there is no next
//! link, when the next link points at an already-visited URL (malformed
//! pagers do loop), or when the configured page cap is reached. All crawl
//! state — the visited set and the accumulated leads — is local to the
//! traversal, so it runs unchanged against fixture HTML.

use crate::fetch::PageFetcher;
use crate::registry::CompanyRegistry;
use crate::text::normalize;
use itertools::Itertools;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// One company detail page discovered on the listing, attributed to a
/// tracked symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyLead {
    pub symbol: String,
    /// Display name as it appeared in the listing row.
    pub name: String,
    /// Absolute URL of the company's report page.
    pub url: String,
}

/// Crawl traversal limits.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Hard cap on listing pages walked, cycle guard aside.
    pub max_pages: usize,
    /// Politeness delay between successive listing-page fetches.
    pub page_delay: Duration,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_pages: 50,
            page_delay: Duration::from_millis(1000),
        }
    }
}

/// Walk the paginated listing starting at `start_url`.
///
/// Returns the ordered, URL-deduplicated leads for companies present in
/// `registry` (first occurrence wins). Rows naming untracked companies are
/// discarded silently. A fetch failure ends the walk but keeps everything
/// discovered so far.
///
/// # Errors
///
/// Only a malformed `start_url` is an error; per-page failures are logged
/// and absorbed.
#[instrument(level = "info", skip_all, fields(start_url = %start_url))]
pub async fn crawl_listing<F: PageFetcher>(
    fetcher: &F,
    registry: &CompanyRegistry,
    start_url: &str,
    options: &CrawlOptions,
) -> Result<Vec<CompanyLead>, Box<dyn Error>> {
    let base = Url::parse(start_url)?;
    let mut visited: HashSet<String> = HashSet::new();
    let mut leads: Vec<CompanyLead> = Vec::new();
    let mut current = start_url.to_string();
    let mut pages_walked = 0usize;

    while pages_walked < options.max_pages {
        if !visited.insert(current.clone()) {
            info!(url = %current, "Next link points at a visited page; crawl done");
            break;
        }
        pages_walked += 1;

        let html = match fetcher.fetch(&current).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %current, error = %e, "Listing page fetch failed; stopping walk");
                break;
            }
        };

        let (mut found, next) = parse_listing_page(&html, registry, &base);
        debug!(url = %current, rows_matched = found.len(), "Listing page parsed");
        leads.append(&mut found);

        match next {
            Some(next_url) => {
                current = next_url;
                sleep(options.page_delay).await;
            }
            None => {
                info!(pages_walked, "No next link; crawl done");
                break;
            }
        }
    }

    let leads: Vec<CompanyLead> = leads.into_iter().unique_by(|l| l.url.clone()).collect();
    info!(
        pages_walked,
        companies_found = leads.len(),
        "Listing crawl completed"
    );
    Ok(leads)
}

/// Extract tracked-company leads and the next-page URL from one listing
/// page. Pure HTML-in, data-out; no fetching.
fn parse_listing_page(
    html: &str,
    registry: &CompanyRegistry,
    base: &Url,
) -> (Vec<CompanyLead>, Option<String>) {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("div.views-row, table.views-table tbody tr").unwrap();
    let link_selector = Selector::parse("a[href]").unwrap();
    let next_selector =
        Selector::parse("li.pager-next a, li.pager__item--next a, a[rel='next']").unwrap();

    let mut found = Vec::new();
    for row in document.select(&row_selector) {
        let Some(anchor) = row.select(&link_selector).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let name = super::flatten_text(anchor);
        if name.is_empty() {
            continue;
        }
        // Untracked names are expected on every page; drop them quietly.
        let Some(symbol) = registry.match_symbol(&normalize(&name)) else {
            continue;
        };
        let Ok(resolved) = base.join(href) else {
            warn!(href, "Unresolvable company link; row skipped");
            continue;
        };
        found.push(CompanyLead {
            symbol: symbol.to_string(),
            name,
            url: resolved.to_string(),
        });
    }

    let next = document
        .select(&next_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| base.join(href).ok())
        .map(|url| url.to_string());

    (found, next)
}
