//! Search pagination driver
//!
//! Runs each query to completion, page by page, accumulating every returned
//! record. Throttled pages are retried after the server's reset time plus a
//! safety margin; any other failure abandons the current query only.

use crate::config::SearchConfig;
use crate::search::{CodeSearch, SearchError, SearchResultRecord};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Per-query counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// The query string
    pub query: String,

    /// Total matches the API reported for this query
    pub reported: u64,

    /// Records actually retrieved for this query
    pub retrieved: u64,

    /// Error that ended the query early, if any
    pub error: Option<String>,
}

/// Everything accumulated over a list of queries
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Records in accumulation order, duplicates included
    pub records: Vec<SearchResultRecord>,

    /// Sum of every query's reported total-match count
    pub total_reported: u64,

    /// Sum of records actually retrieved
    pub total_retrieved: u64,

    /// Counters for each query, in query order
    pub per_query: Vec<QueryStats>,
}

/// Drives a `CodeSearch` backend through a list of queries
pub struct SearchDriver<S> {
    backend: S,
    per_page: u32,
    max_results: u64,
    query_delay: Duration,
    rate_limit_margin: Duration,
}

impl<S: CodeSearch> SearchDriver<S> {
    /// Creates a driver using the paging and delay settings from `config`
    pub fn new(backend: S, config: &SearchConfig) -> Self {
        Self {
            backend,
            per_page: config.per_page,
            max_results: u64::from(config.max_results),
            query_delay: Duration::from_millis(config.query_delay_ms),
            rate_limit_margin: Duration::from_secs(config.rate_limit_margin_secs),
        }
    }

    /// Runs every query in order and returns the accumulated records
    ///
    /// Never fails as a whole: per-query errors are logged and recorded in
    /// `QueryStats::error`.
    pub async fn run(&self, queries: &[String]) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();

        for (index, query) in queries.iter().enumerate() {
            tracing::info!("Query {}/{}: {}", index + 1, queries.len(), query);

            let mut stats = QueryStats {
                query: query.clone(),
                ..QueryStats::default()
            };

            match self.run_query(query, &mut stats, &mut outcome.records).await {
                Ok(()) => {
                    tracing::info!(
                        "Query '{}' complete: {} records retrieved of {} reported",
                        query,
                        stats.retrieved,
                        stats.reported
                    );
                    if !self.query_delay.is_zero() {
                        tokio::time::sleep(self.query_delay).await;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        "Query '{}' abandoned after {} records: {}",
                        query,
                        stats.retrieved,
                        e
                    );
                    stats.error = Some(e.to_string());
                }
            }

            outcome.total_reported += stats.reported;
            outcome.total_retrieved += stats.retrieved;
            outcome.per_query.push(stats);
        }

        outcome
    }

    /// Pages through one query, appending records as they arrive
    async fn run_query(
        &self,
        query: &str,
        stats: &mut QueryStats,
        records: &mut Vec<SearchResultRecord>,
    ) -> Result<(), SearchError> {
        let mut page = 1u32;
        let mut reported: Option<u64> = None;

        loop {
            let result = match self.backend.search_page(query, page, self.per_page).await {
                Ok(result) => result,
                Err(SearchError::RateLimited { reset_at }) => {
                    let wait = rate_limit_wait(reset_at, Utc::now(), self.rate_limit_margin);
                    tracing::warn!(
                        "Rate limited on '{}' page {}, sleeping {}s before retrying",
                        query,
                        page,
                        wait.as_secs()
                    );
                    tokio::time::sleep(wait).await;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if reported.is_none() {
                reported = Some(result.total_count);
                stats.reported = result.total_count;
            }

            let received = result.records.len() as u64;
            stats.retrieved += received;
            records.extend(result.records);

            tracing::debug!("'{}' page {}: {} records", query, page, received);

            let limit = stats.reported.min(self.max_results);
            let fetched_cap = u64::from(page) * u64::from(self.per_page) >= self.max_results;
            if received == 0 || stats.retrieved >= limit || fetched_cap {
                return Ok(());
            }

            page += 1;
        }
    }
}

/// Computes how long to sleep before retrying a throttled request
///
/// A reset time already in the past waits for the margin alone.
pub fn rate_limit_wait(reset_at: DateTime<Utc>, now: DateTime<Utc>, margin: Duration) -> Duration {
    let until_reset = (reset_at - now).to_std().unwrap_or(Duration::ZERO);
    until_reset + margin
}
