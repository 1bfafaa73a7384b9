//! Discovery of company report documents on the listing site.
//!
//! Discovery runs in two phases, mirroring the site's structure:
//!
//! 1. **Listing crawl** ([`listing`]): walk the paginated
//!    "rapports des sociétés cotées" pages, resolve each row's company name
//!    to a tracked symbol, and collect (symbol, company-page URL) leads.
//! 2. **Company scrape** ([`company`]): visit each lead's page, pull out
//!    every row linking a PDF, and build dated report candidates.
//!
//! Both phases consume the [`crate::fetch::PageFetcher`] capability and are
//! strictly sequential, with a politeness delay between page visits. A
//! failed page is logged and skipped; it never aborts the run.

pub mod company;
pub mod listing;

use scraper::ElementRef;

/// Flatten an element's text nodes into one whitespace-collapsed string.
pub(crate) fn flatten_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::registry::CompanyRegistry;

    /// A three-company registry used by the crawl and scrape tests.
    pub fn tracked_companies() -> CompanyRegistry {
        CompanyRegistry::from_yaml(
            r#"
- symbol: SNTS
  name: SONATEL SN
  aliases: [sonatel, snts]
- symbol: NTLC
  name: NESTLE CI
  aliases: [nestle, ntlc]
- symbol: BOAC
  name: BANK OF AFRICA CI
  aliases: [boac, ivoire]
"#,
        )
        .unwrap()
    }
}
