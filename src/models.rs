//! Core data structures for discovered report documents.
//!
//! - [`ReportCandidate`]: one downloadable document with inferred metadata,
//!   not yet filtered
//! - [`ReportRegistry`]: per-symbol, URL-deduplicated collection of
//!   candidates built up over a crawl run
//!
//! The registry is built once per run, handed to the relevance filter, and
//! discarded. It is owned by the sequential crawl and never shared.

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

/// A discovered report document, attributed to a tracked company.
#[derive(Debug, Clone)]
pub struct ReportCandidate {
    /// Flattened text of the listing row the document was found in.
    pub title: String,
    /// Absolute, canonical URL of the document. The dedup key.
    pub url: String,
    /// The raw text the date was inferred from.
    pub raw_date_text: String,
    /// Inferred publication date, or the 1900-01-01 sentinel.
    pub inferred_date: NaiveDate,
    /// Symbol of the company the document belongs to.
    pub owner_symbol: String,
}

/// Per-symbol, insertion-ordered collection of report candidates.
///
/// Duplicate URLs are expected and frequent (the same page is walked more
/// than once across crawl passes); re-inserting one is a silent no-op.
#[derive(Debug, Default)]
pub struct ReportRegistry {
    by_symbol: HashMap<String, Vec<ReportCandidate>>,
}

impl ReportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `candidate` to the symbol's list unless that symbol already
    /// holds a candidate with the same URL. Returns whether it was kept.
    pub fn insert(&mut self, symbol: &str, candidate: ReportCandidate) -> bool {
        let entries = self.by_symbol.entry(symbol.to_string()).or_default();
        if entries.iter().any(|c| c.url == candidate.url) {
            debug!(symbol, url = %candidate.url, "Duplicate report URL dropped");
            return false;
        }
        entries.push(candidate);
        true
    }

    /// Candidates discovered for a symbol, in insertion order.
    pub fn reports(&self, symbol: &str) -> &[ReportCandidate] {
        self.by_symbol.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total candidate count across all symbols.
    pub fn total(&self) -> usize {
        self.by_symbol.values().map(Vec::len).sum()
    }

    /// Number of symbols with at least one candidate.
    pub fn company_count(&self) -> usize {
        self.by_symbol.values().filter(|v| !v.is_empty()).count()
    }
}
