//! Text canonicalization for company-name matching.
//!
//! Listing rows on the BRVM site spell company names inconsistently:
//! accented and unaccented variants, stray punctuation, uneven casing and
//! whitespace. Everything that participates in alias matching is first run
//! through [`normalize`] so both sides compare in the same canonical form.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonicalize free text for alias matching.
///
/// The result is lowercase ASCII with diacritics stripped, everything
/// outside `[a-z0-9 .]` replaced by a space, and whitespace runs collapsed
/// to a single space. Idempotent: normalizing an already-normalized string
/// is a no-op.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize("Côte d'Ivoire"), "cote d ivoire");
/// assert_eq!(normalize("NEI-CEDA  CI"), "nei ceda ci");
/// ```
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    stripped
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
