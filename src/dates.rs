//! Best-effort date inference from free-form French report titles.
//!
//! BRVM listing rows carry no structured publication date; the only signal
//! is the title text ("Rapport T3 2023", "1er semestre 2022", "Rapport
//! annuel 2021 au 31/12/2021", ...). [`infer_date`] turns that text into a
//! sortable calendar date through a fixed rule cascade:
//!
//! 1. no year 2000-2099 in the text → the sentinel date (1900-01-01);
//! 2. a quarter marker (`t3`, `3er trimestre`) → first day of the quarter's
//!    closing month;
//! 3. a semester marker (`s1`, `1er semestre`) → June 1 for the first
//!    semester, December 1 otherwise;
//! 4. `annuel`, `31/12` or `31 dec` → December 31;
//! 5. otherwise June 15 as a mid-year default.
//!
//! Quarter is checked before semester on purpose: noisy titles can carry
//! both an `s<digit>` and a `t<digit>` token, and the quarter is the
//! finer-grained signal. Downstream sorting and the relevance window both
//! depend on this exact ordering.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20\d{2})\b").unwrap());
static QUARTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"t(\d)|(\d)\s*er\s*trimestre").unwrap());
static SEMESTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"s(\d)|(\d)\s*er\s*semestre").unwrap());

/// The "unknown/unordered" marker used when no year can be found.
pub fn sentinel_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()
}

/// Infer a calendar date from a report title or listing-row text.
///
/// Pure function; matching is case-insensitive. Returns [`sentinel_date`]
/// when the text carries no usable year.
pub fn infer_date(text: &str) -> NaiveDate {
    let lowered = text.to_lowercase();

    let Some(year) = YEAR_RE
        .captures(&lowered)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
    else {
        return sentinel_date();
    };

    if let Some(caps) = QUARTER_RE.captures(&lowered) {
        if let Some(quarter) = first_digit(&caps) {
            // An out-of-range quarter digit ("t0", "t7") yields no valid
            // month and falls through to the coarser rules.
            if let Some(date) = NaiveDate::from_ymd_opt(year, quarter * 3, 1) {
                return date;
            }
        }
    }

    if let Some(caps) = SEMESTER_RE.captures(&lowered) {
        if let Some(semester) = first_digit(&caps) {
            let month = if semester == 1 { 6 } else { 12 };
            return NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        }
    }

    if lowered.contains("annuel") || lowered.contains("31/12") || lowered.contains("31 dec") {
        return NaiveDate::from_ymd_opt(year, 12, 31).unwrap();
    }

    NaiveDate::from_ymd_opt(year, 6, 15).unwrap()
}

/// Pull the digit out of whichever alternation branch matched.
fn first_digit(caps: &regex::Captures<'_>) -> Option<u32> {
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_quarter_marker() {
        assert_eq!(infer_date("Rapport T3 2023 BANK OF AFRICA"), ymd(2023, 9, 1));
        assert_eq!(infer_date("Note T1 2024"), ymd(2024, 3, 1));
        assert_eq!(infer_date("3 er trimestre 2022"), ymd(2022, 9, 1));
    }

    #[test]
    fn test_semester_marker() {
        assert_eq!(infer_date("1er semestre 2022 SONATEL"), ymd(2022, 6, 1));
        assert_eq!(infer_date("Rapport S2 2023"), ymd(2023, 12, 1));
        assert_eq!(infer_date("Etats financiers S1 2021"), ymd(2021, 6, 1));
    }

    #[test]
    fn test_quarter_wins_over_semester() {
        // Both markers present; the finer-grained quarter decides.
        assert_eq!(infer_date("Rapport S1 T2 2023"), ymd(2023, 6, 1));
        assert_eq!(infer_date("T4 et S2 2022"), ymd(2022, 12, 1));
    }

    #[test]
    fn test_invalid_quarter_falls_through() {
        // "t0" gives month 0; the annual rule takes over.
        assert_eq!(infer_date("t0 rapport annuel 2021"), ymd(2021, 12, 31));
    }

    #[test]
    fn test_annual_markers() {
        assert_eq!(
            infer_date("Rapport annuel 2021, 31/12/2021"),
            ymd(2021, 12, 31)
        );
        assert_eq!(infer_date("Comptes au 31/12 2020"), ymd(2020, 12, 31));
        assert_eq!(infer_date("Exercice clos au 31 DEC 2019"), ymd(2019, 12, 31));
    }

    #[test]
    fn test_mid_year_default() {
        assert_eq!(
            infer_date("Communiqué 2020 sans précision"),
            ymd(2020, 6, 15)
        );
    }

    #[test]
    fn test_no_year_gives_sentinel() {
        assert_eq!(infer_date("Communiqué sans année"), sentinel_date());
        assert_eq!(infer_date(""), sentinel_date());
        // A 19xx year is outside the recognized range.
        assert_eq!(infer_date("Archives 1998"), sentinel_date());
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(infer_date("RAPPORT ANNUEL 2021"), ymd(2021, 12, 31));
        assert_eq!(infer_date("rapport t2 2023"), ymd(2023, 6, 1));
    }
}
