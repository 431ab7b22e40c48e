//! Collection coordinator - main pipeline orchestration
//!
//! The pipeline is strictly sequential: every search request, download and file
//! write blocks until it completes. The only suspension points are the rate-limit
//! cooldown and the fixed courtesy delays.

use crate::cache;
use crate::config::Config;
use crate::output::{
    deduplicate, write_csv, write_failed, write_json, write_summary, RunSummary, FAILED_JSON,
    RECORDS_CSV, RECORDS_JSON, SUMMARY_TXT,
};
use crate::retrieval::{FetchOutcome, RawFetcher};
use crate::search::{CodeSearch, GithubSearch, SearchDriver, SearchResultRecord};
use crate::SurveyError;
use std::path::PathBuf;
use std::time::Duration;

/// Progress is logged after this many records
const PROGRESS_INTERVAL: usize = 25;

/// Counters and artifacts of one collection run
#[derive(Debug, Clone)]
pub struct CollectionReport {
    /// Number of queries issued
    pub queries: usize,

    /// Queries abandoned because of a non-rate-limit error
    pub failed_queries: usize,

    /// Deduplicated records with their final `downloaded` flags
    pub records: Vec<SearchResultRecord>,

    /// Records whose retrieval failed
    pub failed: Vec<SearchResultRecord>,

    /// Human-readable run summary
    pub summary: RunSummary,

    /// Files written by the run
    pub artifacts: Vec<PathBuf>,
}

/// Main collection coordinator
pub struct Collector<S> {
    config: Config,
    driver: SearchDriver<S>,
    fetcher: RawFetcher,
}

impl Collector<GithubSearch> {
    /// Creates a collector backed by the GitHub search API
    pub fn new(config: Config, token: &str) -> Result<Self, SurveyError> {
        let backend = GithubSearch::new(&config.search.api_url, token)?;
        Self::with_backend(config, backend, token)
    }
}

impl<S: CodeSearch> Collector<S> {
    /// Creates a collector over an arbitrary search backend
    pub fn with_backend(config: Config, backend: S, token: &str) -> Result<Self, SurveyError> {
        let driver = SearchDriver::new(backend, &config.search);
        let fetcher = RawFetcher::new(&config.retrieval, token)?;
        Ok(Self {
            config,
            driver,
            fetcher,
        })
    }

    /// Runs the pipeline to completion
    ///
    /// Only output directory creation and artifact writes can fail the run;
    /// query and download failures are logged and counted.
    pub async fn run(&self) -> Result<CollectionReport, SurveyError> {
        let output = &self.config.output;
        std::fs::create_dir_all(&output.output_dir)?;
        std::fs::create_dir_all(&output.download_dir)?;

        let queries = &self.config.search.queries;
        tracing::info!("Starting collection with {} queries", queries.len());

        let outcome = self.driver.run(queries).await;
        let failed_queries = outcome
            .per_query
            .iter()
            .filter(|q| q.error.is_some())
            .count();
        tracing::info!(
            "Search finished: {} records retrieved, {} matches reported",
            outcome.total_retrieved,
            outcome.total_reported
        );

        let (mut records, duplicates_removed) = deduplicate(outcome.records);
        tracing::info!(
            "{} unique records after removing {} duplicates",
            records.len(),
            duplicates_removed
        );

        let (cached, failed) = self.download_all(&mut records).await;

        let mut artifacts = Vec::new();

        let json_path = output.output_dir.join(RECORDS_JSON);
        write_json(&records, &json_path)?;
        artifacts.push(json_path);

        let csv_path = output.output_dir.join(RECORDS_CSV);
        write_csv(&records, &csv_path)?;
        artifacts.push(csv_path);

        let failed_path = output.output_dir.join(FAILED_JSON);
        if write_failed(&failed, &failed_path)? {
            artifacts.push(failed_path);
        }

        let mut summary = RunSummary::from_records(&records);
        summary.total_reported = outcome.total_reported;
        summary.total_retrieved = outcome.total_retrieved;
        summary.duplicates_removed = duplicates_removed;
        summary.cached = cached;
        summary.failed = failed.len();

        let summary_path = output.output_dir.join(SUMMARY_TXT);
        write_summary(&summary, &summary_path)?;
        artifacts.push(summary_path);

        tracing::info!(
            "Collection complete: {} downloaded, {} failed",
            summary.downloaded,
            summary.failed
        );

        Ok(CollectionReport {
            queries: queries.len(),
            failed_queries,
            records,
            failed,
            summary,
            artifacts,
        })
    }

    /// Ensures every record is in the cache, downloading the missing ones
    ///
    /// # Returns
    ///
    /// The number of cache hits and the records that could not be retrieved
    async fn download_all(&self, records: &mut [SearchResultRecord]) -> (usize, Vec<SearchResultRecord>) {
        let root = &self.config.output.download_dir;
        let delay = Duration::from_millis(self.config.retrieval.download_delay_ms);
        let total = records.len();
        let mut cached = 0;
        let mut failed = Vec::new();

        for (index, record) in records.iter_mut().enumerate() {
            if index > 0 && index % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {}/{} records, {} cached, {} failed",
                    index,
                    total,
                    cached,
                    failed.len()
                );
            }

            if cache::is_cached(&record.repository, &record.path, root) {
                tracing::debug!("Cached: {}/{}", record.repository, record.path);
                record.downloaded = true;
                cached += 1;
                continue;
            }

            match self.fetcher.fetch(record).await {
                FetchOutcome::Found { branch, body } => {
                    let document = cache::DownloadedDocument {
                        repository: record.repository.clone(),
                        path: record.path.clone(),
                        content: body,
                    };
                    match document.store(root) {
                        Ok(path) => {
                            tracing::debug!(
                                "Stored {}/{} ({}) at {}",
                                record.repository,
                                record.path,
                                branch,
                                path.display()
                            );
                            record.downloaded = true;
                        }
                        Err(e) => {
                            tracing::error!(
                                "Failed to store {}/{}: {}",
                                record.repository,
                                record.path,
                                e
                            );
                            record.downloaded = false;
                            failed.push(record.clone());
                        }
                    }
                }
                FetchOutcome::Exhausted { attempts } => {
                    tracing::warn!(
                        "Could not download {}/{}: {}",
                        record.repository,
                        record.path,
                        attempts.join("; ")
                    );
                    record.downloaded = false;
                    failed.push(record.clone());
                }
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        (cached, failed)
    }
}
