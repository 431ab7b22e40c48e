//! Console report and JSON dump of analyzer results

use crate::analysis::headings::HeadingRecord;
use crate::analysis::stats::{AggregateStatistics, HeadingTally};
use crate::output::OutputResult;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Keywords whose matching headings get their own report section
pub const THEMATIC_KEYWORDS: &[&str] = &[
    "threat",
    "security",
    "attack",
    "risk",
    "model",
    "assumption",
    "scope",
    "overview",
    "introduction",
    "conclusion",
    "mitigation",
    "control",
    "vulnerability",
    "asset",
    "actor",
];

/// Heading levels shown in the per-level report
const REPORTED_LEVELS: std::ops::RangeInclusive<usize> = 1..=6;

/// Summary block of the JSON dump
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpSummary {
    pub total_files_found: usize,
    pub files_processed: usize,
    pub read_errors: usize,
    pub total_headings: usize,
    pub unique_headings: usize,
    pub analyzed_at: String,
}

/// Structured document written at the end of an analyzer run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDump {
    pub summary: DumpSummary,
    pub heading_counts: BTreeMap<String, HeadingTally>,
    pub headings_by_level: BTreeMap<usize, BTreeMap<String, u64>>,
    pub file_headings: BTreeMap<String, Vec<HeadingRecord>>,
    pub filename_patterns: BTreeMap<String, u64>,
    pub filenames: Vec<String>,
}

impl AnalysisDump {
    /// Snapshots the accumulators into a serializable document
    pub fn from_statistics(stats: &AggregateStatistics) -> Self {
        Self {
            summary: DumpSummary {
                total_files_found: stats.total_files_found,
                files_processed: stats.files_processed,
                read_errors: stats.read_errors,
                total_headings: stats.total_headings,
                unique_headings: stats.unique_headings(),
                analyzed_at: Utc::now().to_rfc3339(),
            },
            heading_counts: stats
                .heading_counts
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            headings_by_level: stats
                .level_counts
                .iter()
                .map(|(level, counts)| {
                    let sorted: BTreeMap<String, u64> =
                        counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    (*level, sorted)
                })
                .collect(),
            file_headings: stats.file_headings.clone(),
            filename_patterns: stats.filename_patterns.clone(),
            filenames: stats.filenames.clone(),
        }
    }
}

/// Writes the JSON dump, replacing any earlier one
pub fn write_dump(stats: &AggregateStatistics, output_path: &Path) -> OutputResult<()> {
    let dump = AnalysisDump::from_statistics(stats);
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, &dump)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Prints the analysis report to stdout
pub fn print_report(stats: &AggregateStatistics) {
    print!("{}", format_report(stats));
}

/// Formats the analysis report
pub fn format_report(stats: &AggregateStatistics) -> String {
    let mut out = String::new();

    out.push_str("=== Heading Analysis ===\n\n");
    out.push_str("Overview:\n");
    out.push_str(&format!("  Files found: {}\n", stats.total_files_found));
    out.push_str(&format!("  Files with headings: {}\n", stats.files_processed));
    if stats.read_errors > 0 {
        out.push_str(&format!("  Unreadable files: {}\n", stats.read_errors));
    }
    out.push_str(&format!("  Total headings: {}\n", stats.total_headings));
    out.push_str(&format!("  Unique headings: {}\n\n", stats.unique_headings()));

    out.push_str("Top 20 Headings:\n");
    for (rank, (key, tally)) in stats.top_headings(20).into_iter().enumerate() {
        out.push_str(&format!(
            "  {:>2}. {} ({}) e.g. \"{}\"\n",
            rank + 1,
            key,
            tally.count,
            tally.example
        ));
    }
    out.push('\n');

    for level in REPORTED_LEVELS {
        let total = stats.level_total(level);
        if total == 0 {
            continue;
        }
        out.push_str(&format!(
            "Level {} Headings ({} total):\n",
            level, total
        ));
        for (key, count) in stats.top_for_level(level, 15) {
            out.push_str(&format!("  {}: {}\n", key, count));
        }
        out.push('\n');
    }

    out.push_str("Filename Patterns:\n");
    let mut patterns: Vec<_> = stats.filename_patterns.iter().collect();
    patterns.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (pattern, count) in patterns {
        let percentage = if stats.total_files_found > 0 {
            (*count as f64 / stats.total_files_found as f64) * 100.0
        } else {
            0.0
        };
        out.push_str(&format!("  {}: {} ({:.1}%)\n", pattern, count, percentage));
    }
    out.push('\n');

    out.push_str("Most Common Filenames:\n");
    for (label, count) in stats.top_clusters(20) {
        out.push_str(&format!("  {}: {}\n", label, count));
    }
    out.push('\n');

    out.push_str("Most Common Filename Words:\n");
    for (word, count) in stats.top_words(20) {
        out.push_str(&format!("  {}: {}\n", word, count));
    }
    out.push('\n');

    for keyword in THEMATIC_KEYWORDS {
        let matches = stats.keyword_matches(keyword, 10);
        if matches.is_empty() {
            continue;
        }
        out.push_str(&format!("Headings containing '{}':\n", keyword));
        for (key, count) in matches {
            out.push_str(&format!("  {}: {}\n", key, count));
        }
        out.push('\n');
    }

    out
}
