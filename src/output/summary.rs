//! Plain-text run summary
//!
//! This module renders the human-readable summary of a collection run: totals,
//! the repositories contributing the most documents, and a lookup line for one
//! well-known repository.

use crate::output::OutputResult;
use crate::search::SearchResultRecord;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Repository whose presence is always reported
pub const SENTINEL_REPOSITORY: &str = "OWASP/threat-dragon";

/// Number of repositories listed in the ranking
const TOP_REPOSITORIES: usize = 20;

/// Summary of one collection run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,

    // Search statistics
    pub total_reported: u64,
    pub total_retrieved: u64,
    pub duplicates_removed: usize,

    // Download statistics
    pub total_unique: usize,
    pub downloaded: usize,
    pub cached: usize,
    pub failed: usize,

    /// Repositories ranked by record count
    pub top_repositories: Vec<(String, usize)>,

    /// Paths recorded for the sentinel repository
    pub sentinel_paths: Vec<String>,
}

impl RunSummary {
    /// Builds a summary from the deduplicated, post-download record list
    pub fn from_records(records: &[SearchResultRecord]) -> Self {
        Self {
            generated_at: Utc::now(),
            total_reported: 0,
            total_retrieved: records.len() as u64,
            duplicates_removed: 0,
            total_unique: records.len(),
            downloaded: records.iter().filter(|r| r.downloaded).count(),
            cached: 0,
            failed: records.iter().filter(|r| !r.downloaded).count(),
            top_repositories: top_repositories(records, TOP_REPOSITORIES),
            sentinel_paths: records
                .iter()
                .filter(|r| r.repository.eq_ignore_ascii_case(SENTINEL_REPOSITORY))
                .map(|r| r.path.clone())
                .collect(),
        }
    }

    /// Returns the download success rate as a percentage
    pub fn download_rate(&self) -> f64 {
        if self.total_unique == 0 {
            return 0.0;
        }
        (self.downloaded as f64 / self.total_unique as f64) * 100.0
    }
}

/// Ranks repositories by number of records, most first
///
/// Ties are broken by repository name so the ranking is stable.
pub fn top_repositories(records: &[SearchResultRecord], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.repository.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(repo, count)| (repo.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

/// Writes the summary to `output_path`
pub fn write_summary(summary: &RunSummary, output_path: &Path) -> OutputResult<()> {
    let mut file = File::create(output_path)?;
    file.write_all(format_summary(summary).as_bytes())?;
    Ok(())
}

/// Formats the summary as plain text
pub fn format_summary(summary: &RunSummary) -> String {
    let mut text = String::new();

    text.push_str("Threat Model Survey Summary\n");
    text.push_str("===========================\n\n");
    text.push_str(&format!(
        "Generated: {}\n\n",
        summary.generated_at.to_rfc3339()
    ));

    text.push_str(&format!(
        "Total matches reported: {}\n",
        summary.total_reported
    ));
    text.push_str(&format!(
        "Total records retrieved: {}\n",
        summary.total_retrieved
    ));
    text.push_str(&format!(
        "Duplicates removed: {}\n",
        summary.duplicates_removed
    ));
    text.push_str(&format!("Total unique files: {}\n", summary.total_unique));
    text.push_str(&format!(
        "Downloaded: {} ({:.1}%, {} already cached)\n",
        summary.downloaded,
        summary.download_rate(),
        summary.cached
    ));
    text.push_str(&format!("Failed downloads: {}\n\n", summary.failed));

    text.push_str(&format!(
        "Top {} repositories by file count:\n",
        TOP_REPOSITORIES
    ));
    if summary.top_repositories.is_empty() {
        text.push_str("  (none)\n");
    }
    for (rank, (repo, count)) in summary.top_repositories.iter().enumerate() {
        text.push_str(&format!("  {:>2}. {}: {}\n", rank + 1, repo, count));
    }
    text.push('\n');

    if summary.sentinel_paths.is_empty() {
        text.push_str(&format!("{}: not found\n", SENTINEL_REPOSITORY));
    } else {
        text.push_str(&format!(
            "{}: found at {}\n",
            SENTINEL_REPOSITORY,
            summary.sentinel_paths.join(", ")
        ));
    }

    text
}
