//! Heading and filename analysis over the downloaded corpus
//!
//! Runs independently of the collection pipeline: it only needs a directory of
//! markdown documents. Each file is processed on its own, line by line, and
//! folded into one `AggregateStatistics`.

pub mod filenames;
pub mod headings;
mod report;
mod stats;

pub use headings::{extract_headings, normalize_text, parse_heading, HeadingRecord};
pub use report::{
    format_report, print_report, write_dump, AnalysisDump, DumpSummary, THEMATIC_KEYWORDS,
};
pub use stats::{AggregateStatistics, HeadingTally};

use crate::SurveyError;
use std::path::Path;
use walkdir::WalkDir;

/// Returns true for files with an `.md` extension, in any case
fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

/// Walks `root` and aggregates heading and filename statistics
///
/// Filename features are recorded before the file is read, so an unreadable
/// file (including one that is not valid UTF-8) still counts towards filename
/// statistics while contributing no headings.
///
/// # Returns
///
/// * `Ok(AggregateStatistics)` - Walk completed (individual file errors are logged)
/// * `Err(SurveyError::MissingRoot)` - `root` is not a directory
pub fn analyze_directory(root: &Path) -> Result<AggregateStatistics, SurveyError> {
    if !root.is_dir() {
        return Err(SurveyError::MissingRoot(root.display().to_string()));
    }

    let mut stats = AggregateStatistics::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }

        let path = entry.path();
        let file_id = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        stats.record_file(path);

        match std::fs::read_to_string(path) {
            Ok(content) => {
                let headings = extract_headings(&content, &file_id);
                tracing::debug!("{}: {} headings", file_id, headings.len());
                stats.record_headings(&file_id, headings);
            }
            Err(e) => {
                tracing::error!("Error processing {}: {}", file_id, e);
                stats.record_read_error();
            }
        }
    }

    tracing::info!(
        "Analyzed {} files, {} with headings",
        stats.total_files_found,
        stats.files_processed
    );

    Ok(stats)
}
