//! Output module for persisting collection results
//!
//! This module handles:
//! - Deduplicating accumulated search records
//! - Writing the record list as JSON and CSV
//! - Writing failed downloads separately
//! - Generating the plain-text run summary
//!
//! Every artifact has a fixed file name and is overwritten on each run.

mod dedup;
mod records;
mod summary;

pub use dedup::deduplicate;
pub use records::{format_csv, write_csv, write_failed, write_json};
pub use summary::{format_summary, top_repositories, write_summary, RunSummary, SENTINEL_REPOSITORY};

use thiserror::Error;

/// Deduplicated record list (JSON)
pub const RECORDS_JSON: &str = "threat_models.json";

/// Deduplicated record list (CSV)
pub const RECORDS_CSV: &str = "threat_models.csv";

/// Records whose download failed (JSON, only written when non-empty)
pub const FAILED_JSON: &str = "failed_downloads.json";

/// Plain-text run summary
pub const SUMMARY_TXT: &str = "summary.txt";

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
