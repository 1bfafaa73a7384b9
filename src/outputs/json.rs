//! JSON snapshot of the filtered report registry.
//!
//! One file per run, organized by date:
//! ```text
//! output_dir/
//! └── 2026-08-30/
//!     └── reports.json
//! ```
//!
//! Per company the snapshot lists `{title, url, date}` in newest-first
//! order; `date` renders as `YYYY-MM`, or `"Date inconnue"` for the
//! sentinel. Companies with zero surviving reports keep their (empty)
//! entry so the consumer sees the full tracked set.

use crate::models::ReportCandidate;
use crate::registry::CompanyRegistry;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// The full result of one discovery run.
#[derive(Debug, Serialize)]
pub struct RunSnapshot {
    pub generated_at: String,
    pub local_date: String,
    pub companies: Vec<CompanySnapshot>,
}

#[derive(Debug, Serialize)]
pub struct CompanySnapshot {
    pub symbol: String,
    pub name: String,
    pub reports: Vec<ReportEntry>,
}

#[derive(Debug, Serialize)]
pub struct ReportEntry {
    pub title: String,
    pub url: String,
    pub date: String,
}

fn render_date(date: NaiveDate) -> String {
    use chrono::Datelike;
    if date.year() > 1900 {
        date.format("%Y-%m").to_string()
    } else {
        "Date inconnue".to_string()
    }
}

/// Assemble the snapshot in registry order.
pub fn build_snapshot(
    registry: &CompanyRegistry,
    selected: &HashMap<String, Vec<ReportCandidate>>,
) -> RunSnapshot {
    let now = Local::now();
    let companies = registry
        .companies()
        .iter()
        .map(|company| CompanySnapshot {
            symbol: company.symbol.clone(),
            name: company.name.clone(),
            reports: selected
                .get(&company.symbol)
                .map(|candidates| {
                    candidates
                        .iter()
                        .map(|c| ReportEntry {
                            title: c.title.clone(),
                            url: c.url.clone(),
                            date: render_date(c.inferred_date),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();

    RunSnapshot {
        generated_at: now.to_rfc3339(),
        local_date: now.date_naive().to_string(),
        companies,
    }
}

/// Write a [`RunSnapshot`] under `{output_dir}/{date}/reports.json`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_snapshot(
    snapshot: &RunSnapshot,
    output_dir: &str,
) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    let full_dir = format!("{}/{}", output_dir.trim_end_matches('/'), snapshot.local_date);
    if let Err(e) = fs::create_dir_all(&full_dir).await {
        error!(%full_dir, error = %e, "Failed to create snapshot dir");
        return Err(e.into());
    }

    let path = format!("{full_dir}/reports.json");
    fs::write(&path, json).await?;
    info!(%path, companies = snapshot.companies.len(), "Wrote report snapshot");
    Ok(())
}
