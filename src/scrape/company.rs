//! Per-company report-page scraping.
//!
//! Each lead from the listing crawl points at one company's report page.
//! Every row there that links a PDF becomes a [`ReportCandidate`]: the
//! row's flattened text is both the title and the date-inference input,
//! and relative hrefs are resolved against the site origin. Candidates go
//! into the [`ReportRegistry`], which silently drops URLs already seen for
//! that symbol.

use crate::dates::infer_date;
use crate::fetch::PageFetcher;
use crate::models::{ReportCandidate, ReportRegistry};
use crate::scrape::listing::CompanyLead;
use scraper::{Html, Selector};
use tracing::{info, instrument, warn};
use url::Url;

/// Fetch one company's report page and insert its candidates.
///
/// Returns the number of candidates actually kept (after dedup). A fetch
/// failure or absent listing structure skips this company without touching
/// the rest of the run.
#[instrument(level = "info", skip_all, fields(symbol = %lead.symbol, url = %lead.url))]
pub async fn scrape_company<F: PageFetcher>(
    fetcher: &F,
    lead: &CompanyLead,
    origin: &Url,
    reports: &mut ReportRegistry,
) -> usize {
    let html = match fetcher.fetch(&lead.url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Company page fetch failed; skipping company");
            return 0;
        }
    };

    let candidates = extract_candidates(&html, &lead.symbol, origin);
    let mut kept = 0usize;
    for candidate in candidates {
        if reports.insert(&lead.symbol, candidate) {
            kept += 1;
        }
    }
    info!(kept, "Company page scraped");
    kept
}

/// Pull report candidates out of one company page's HTML.
///
/// An entirely absent listing structure is a structural mismatch: warned
/// about and treated as zero rows.
pub(crate) fn extract_candidates(html: &str, symbol: &str, origin: &Url) -> Vec<ReportCandidate> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("div.views-row, table tbody tr").unwrap();
    let link_selector = Selector::parse("a[href]").unwrap();

    let mut rows = document.select(&row_selector).peekable();
    if rows.peek().is_none() {
        warn!(symbol, "Expected listing structure absent; zero rows");
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for row in rows {
        let Some(anchor) = row.select(&link_selector).find(|a| {
            a.value()
                .attr("href")
                .is_some_and(|href| href.to_lowercase().ends_with(".pdf"))
        }) else {
            continue;
        };
        // find() above guarantees the attribute.
        let href = anchor.value().attr("href").unwrap();
        let Ok(url) = origin.join(href) else {
            warn!(symbol, href, "Unresolvable PDF link; row skipped");
            continue;
        };
        let text = super::flatten_text(row);
        candidates.push(ReportCandidate {
            title: text.clone(),
            url: url.to_string(),
            raw_date_text: text.clone(),
            inferred_date: infer_date(&text),
            owner_symbol: symbol.to_string(),
        });
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::sentinel_date;
    use crate::fetch::FixtureFetcher;
    use chrono::NaiveDate;

    fn origin() -> Url {
        Url::parse("https://www.brvm.org").unwrap()
    }

    fn lead(url: &str) -> CompanyLead {
        CompanyLead {
            symbol: "SNTS".to_string(),
            name: "SONATEL SN".to_string(),
            url: url.to_string(),
        }
    }

    const COMPANY_PAGE: &str = r#"
        <div class="view-content">
          <div class="views-row">
            <span>SONATEL SN</span>
            <a href="/sites/default/rapport-t3-2023.pdf">Rapport T3 2023</a>
          </div>
          <div class="views-row">
            <a href="https://www.brvm.org/sites/default/annuel-2022.PDF">Rapport annuel 2022</a>
          </div>
          <div class="views-row">
            <a href="/fr/societe/snts">Page sans PDF</a>
          </div>
        </div>
    "#;

    #[tokio::test]
    async fn test_scrape_company_builds_dated_candidates() {
        let fetcher =
            FixtureFetcher::new(&[("https://www.brvm.org/fr/societe/snts", COMPANY_PAGE)]);
        let mut reports = ReportRegistry::new();
        let kept = scrape_company(
            &fetcher,
            &lead("https://www.brvm.org/fr/societe/snts"),
            &origin(),
            &mut reports,
        )
        .await;

        assert_eq!(kept, 2);
        let found = reports.reports("SNTS");
        assert_eq!(
            found[0].url,
            "https://www.brvm.org/sites/default/rapport-t3-2023.pdf"
        );
        assert_eq!(found[0].title, "SONATEL SN Rapport T3 2023");
        assert_eq!(
            found[0].inferred_date,
            NaiveDate::from_ymd_opt(2023, 9, 1).unwrap()
        );
        assert_eq!(
            found[1].inferred_date,
            NaiveDate::from_ymd_opt(2022, 12, 31).unwrap()
        );
    }

    #[tokio::test]
    async fn test_rescrape_is_deduplicated() {
        let fetcher =
            FixtureFetcher::new(&[("https://www.brvm.org/fr/societe/snts", COMPANY_PAGE)]);
        let mut reports = ReportRegistry::new();
        let the_lead = lead("https://www.brvm.org/fr/societe/snts");
        scrape_company(&fetcher, &the_lead, &origin(), &mut reports).await;
        let second = scrape_company(&fetcher, &the_lead, &origin(), &mut reports).await;
        assert_eq!(second, 0);
        assert_eq!(reports.reports("SNTS").len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_company() {
        let fetcher = FixtureFetcher::new(&[]);
        let mut reports = ReportRegistry::new();
        let kept = scrape_company(
            &fetcher,
            &lead("https://www.brvm.org/fr/societe/snts"),
            &origin(),
            &mut reports,
        )
        .await;
        assert_eq!(kept, 0);
        assert!(reports.reports("SNTS").is_empty());
    }

    #[test]
    fn test_missing_structure_is_zero_rows() {
        let candidates = extract_candidates("<html><body></body></html>", "SNTS", &origin());
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_undated_row_gets_sentinel() {
        let html = r#"
            <div class="views-row">
              <a href="/communique.pdf">Communiqué sans année</a>
            </div>
        "#;
        let candidates = extract_candidates(html, "SNTS", &origin());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].inferred_date, sentinel_date());
    }
}
