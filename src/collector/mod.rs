//! Collection pipeline
//!
//! This module wires the pipeline stages together:
//! - Paginated search over the configured queries
//! - Deduplication by `(repository, path)`
//! - Cache check, raw retrieval and storage per record
//! - Persistence of the record dumps and the run summary

mod coordinator;

pub use coordinator::{CollectionReport, Collector};

use crate::config::Config;
use crate::SurveyError;

/// Runs a complete collection against the GitHub API
///
/// # Arguments
///
/// * `config` - The survey configuration
/// * `token` - API credential used for search and raw downloads
///
/// # Returns
///
/// * `Ok(CollectionReport)` - Collection completed
/// * `Err(SurveyError)` - Client setup or output writing failed
pub async fn run_collection(config: Config, token: &str) -> Result<CollectionReport, SurveyError> {
    let collector = Collector::new(config, token)?;
    collector.run().await
}
