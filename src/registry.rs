//! The immutable registry of tracked companies.
//!
//! The registry is loaded once at startup from YAML (a bundled default
//! covering the BRVM listing, or a user-supplied file) and never mutated
//! afterwards. Narrowing to a subset of symbols produces a new restricted
//! registry rather than editing the original.
//!
//! Alias matching is substring-based: a company claims a piece of listing
//! text when any of its aliases occurs verbatim inside the normalized text.
//! When several companies could claim the same text, the first one in file
//! order wins. That tie-break is a documented policy, not an error; a
//! duplicate alias shared by two symbols is a configuration smell and is
//! warned about at load time.

use crate::text::normalize;
use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use tracing::{info, warn};

/// Bundled default registry: the BRVM-listed companies.
const BUNDLED_COMPANIES: &str = include_str!("../companies.yaml");

/// One tracked company. Immutable after registry load.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyRecord {
    /// Stable unique identifier (ticker-like code, e.g. `SNTS`).
    pub symbol: String,
    /// Display name as used on published reports.
    pub name: String,
    /// Normalized text fragments that recognize this company in listing text.
    pub aliases: Vec<String>,
}

/// Ordered, immutable set of [`CompanyRecord`]s.
#[derive(Debug, Clone)]
pub struct CompanyRegistry {
    companies: Vec<CompanyRecord>,
}

impl CompanyRegistry {
    /// Parse a registry from YAML. Aliases are normalized here so matching
    /// never depends on how the file was typed.
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML, an empty company list, a duplicate symbol,
    /// or a company with no usable alias.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        let mut companies: Vec<CompanyRecord> = serde_yaml::from_str(yaml)?;
        if companies.is_empty() {
            return Err("company registry is empty".into());
        }

        let mut seen_symbols = HashSet::new();
        let mut seen_aliases: Vec<(String, String)> = Vec::new();
        for company in &mut companies {
            if !seen_symbols.insert(company.symbol.clone()) {
                return Err(format!("duplicate symbol in registry: {}", company.symbol).into());
            }
            company.aliases = company
                .aliases
                .iter()
                .map(|a| normalize(a))
                .filter(|a| !a.is_empty())
                .collect();
            if company.aliases.is_empty() {
                return Err(format!("company {} has no usable alias", company.symbol).into());
            }
            for alias in &company.aliases {
                if let Some((owner, _)) = seen_aliases.iter().find(|(_, a)| a == alias) {
                    warn!(
                        alias = %alias,
                        first = %owner,
                        second = %company.symbol,
                        "Alias shared by two symbols; first registry entry will win"
                    );
                }
                seen_aliases.push((company.symbol.clone(), alias.clone()));
            }
        }

        Ok(Self { companies })
    }

    /// The bundled BRVM registry.
    pub fn bundled() -> Result<Self, Box<dyn Error>> {
        Self::from_yaml(BUNDLED_COMPANIES)
    }

    /// A new registry keeping only `symbols`, in the original order.
    /// Narrowing never adds entries; unknown symbols are reported and
    /// ignored.
    pub fn restrict_to(&self, symbols: &[String]) -> Self {
        let keep: HashSet<&str> = symbols.iter().map(String::as_str).collect();
        for symbol in &keep {
            if !self.companies.iter().any(|c| c.symbol == *symbol) {
                warn!(symbol = %symbol, "Narrowing mentions a symbol not in the registry");
            }
        }
        let companies: Vec<CompanyRecord> = self
            .companies
            .iter()
            .filter(|c| keep.contains(c.symbol.as_str()))
            .cloned()
            .collect();
        info!(
            kept = companies.len(),
            total = self.companies.len(),
            "Registry narrowed"
        );
        Self { companies }
    }

    /// Resolve normalized listing text to a company symbol.
    ///
    /// Returns the first company (registry order) any of whose aliases is a
    /// substring of `normalized_text`, or `None` when nothing matches.
    pub fn match_symbol(&self, normalized_text: &str) -> Option<&str> {
        self.companies
            .iter()
            .find(|c| c.aliases.iter().any(|a| normalized_text.contains(a.as_str())))
            .map(|c| c.symbol.as_str())
    }

    pub fn companies(&self) -> &[CompanyRecord] {
        &self.companies
    }

    pub fn get(&self, symbol: &str) -> Option<&CompanyRecord> {
        self.companies.iter().find(|c| c.symbol == symbol)
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}
