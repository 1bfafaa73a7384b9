//! Two-tier relevance filtering of discovered report candidates.
//!
//! Relevance is decided against two window boundaries:
//!
//! - at or after `newer_start`: recent enough that every document matters,
//!   kept unconditionally;
//! - inside `[older_start, newer_start)`: kept only when the title carries
//!   one of the required keywords (full statements, not every quarterly
//!   note);
//! - before `older_start`, sentinel dates included: dropped.
//!
//! Survivors are sorted newest-first and capped at the per-company limit
//! the downstream PDF analysis can absorb.

use crate::models::{ReportCandidate, ReportRegistry};
use crate::registry::CompanyRegistry;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Date window and keyword rules for selecting candidates.
#[derive(Debug, Clone)]
pub struct RelevanceRules {
    /// Start of the keyword-gated window.
    pub older_start: NaiveDate,
    /// Start of the keep-everything window.
    pub newer_start: NaiveDate,
    /// Lowercased keywords; one must appear in an in-window title.
    keywords: Vec<String>,
    /// Per-company cap on selected reports, newest first.
    pub top: usize,
}

impl RelevanceRules {
    pub fn new(
        older_start: NaiveDate,
        newer_start: NaiveDate,
        keywords: &[String],
        top: usize,
    ) -> Self {
        Self {
            older_start,
            newer_start,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            top,
        }
    }

    /// Apply the window/keyword rule to one candidate.
    pub fn is_relevant(&self, candidate: &ReportCandidate) -> bool {
        if candidate.inferred_date >= self.newer_start {
            return true;
        }
        if candidate.inferred_date >= self.older_start {
            let title = candidate.title.to_lowercase();
            return self.keywords.iter().any(|k| title.contains(k.as_str()));
        }
        false
    }
}

/// Select the relevant candidates for every tracked company.
///
/// Every company in `registry` gets an entry, possibly empty — partial
/// results are expected output, not an error. Per company the survivors
/// are sorted by inferred date descending and truncated to `rules.top`.
#[instrument(level = "info", skip_all)]
pub fn select_relevant(
    reports: &ReportRegistry,
    registry: &CompanyRegistry,
    rules: &RelevanceRules,
) -> HashMap<String, Vec<ReportCandidate>> {
    let mut selected = HashMap::new();
    for company in registry.companies() {
        let mut kept: Vec<ReportCandidate> = reports
            .reports(&company.symbol)
            .iter()
            .filter(|c| rules.is_relevant(c))
            .cloned()
            .collect();
        kept.sort_by(|a, b| b.inferred_date.cmp(&a.inferred_date));
        kept.truncate(rules.top);
        debug!(
            symbol = %company.symbol,
            discovered = reports.reports(&company.symbol).len(),
            kept = kept.len(),
            "Relevance filter applied"
        );
        selected.insert(company.symbol.clone(), kept);
    }
    let total: usize = selected.values().map(Vec::len).sum();
    info!(total, companies = selected.len(), "Relevance selection done");
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::sentinel_date;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn candidate(title: &str, date: NaiveDate) -> ReportCandidate {
        ReportCandidate {
            title: title.to_string(),
            url: format!("https://www.brvm.org/{}.pdf", title.replace(' ', "-")),
            raw_date_text: title.to_string(),
            inferred_date: date,
            owner_symbol: "SNTS".to_string(),
        }
    }

    fn rules() -> RelevanceRules {
        RelevanceRules::new(
            ymd(2024, 1, 1),
            ymd(2025, 1, 1),
            &["états financiers".to_string()],
            5,
        )
    }

    #[test]
    fn test_in_window_needs_keyword() {
        let rules = rules();
        assert!(!rules.is_relevant(&candidate("Note trimestrielle", ymd(2024, 6, 15))));
        assert!(rules.is_relevant(&candidate("États financiers certifiés", ymd(2024, 6, 15))));
    }

    #[test]
    fn test_recent_kept_unconditionally() {
        let rules = rules();
        assert!(rules.is_relevant(&candidate("Note trimestrielle", ymd(2025, 3, 1))));
        assert!(rules.is_relevant(&candidate("n'importe quoi", ymd(2025, 1, 1))));
    }

    #[test]
    fn test_old_and_sentinel_dropped() {
        let rules = rules();
        assert!(!rules.is_relevant(&candidate("États financiers 2021", ymd(2023, 12, 31))));
        assert!(!rules.is_relevant(&candidate("États financiers", sentinel_date())));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let rules = RelevanceRules::new(
            ymd(2024, 1, 1),
            ymd(2025, 1, 1),
            &["ÉTATS FINANCIERS".to_string()],
            5,
        );
        assert!(rules.is_relevant(&candidate("états financiers annuels", ymd(2024, 3, 1))));
    }

    #[test]
    fn test_selection_sorted_desc_and_capped() {
        let registry = crate::registry::CompanyRegistry::from_yaml(
            r#"
- symbol: SNTS
  name: SONATEL SN
  aliases: [sonatel]
- symbol: NTLC
  name: NESTLE CI
  aliases: [nestle]
"#,
        )
        .unwrap();
        let mut reports = ReportRegistry::new();
        for (i, month) in [3u32, 9, 6, 12].iter().enumerate() {
            reports.insert(
                "SNTS",
                candidate(&format!("rapport {i}"), ymd(2025, *month, 1)),
            );
        }

        let rules = RelevanceRules::new(
            ymd(2024, 1, 1),
            ymd(2025, 1, 1),
            &["états financiers".to_string()],
            3,
        );
        let selected = select_relevant(&reports, &registry, &rules);

        let dates: Vec<NaiveDate> = selected["SNTS"].iter().map(|c| c.inferred_date).collect();
        assert_eq!(dates, vec![ymd(2025, 12, 1), ymd(2025, 9, 1), ymd(2025, 6, 1)]);
        // Companies with nothing discovered still appear, empty.
        assert!(selected["NTLC"].is_empty());
    }
}
