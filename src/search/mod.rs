//! Code search module
//!
//! This module contains everything needed to turn a list of query strings into
//! search result records:
//! - The record type persisted at the end of a run
//! - The `CodeSearch` seam and its GitHub implementation
//! - The pagination driver with rate-limit cooldown

mod client;
mod driver;

pub use client::{raw_url_hint, rate_limit_reset, GithubSearch};
pub use driver::{rate_limit_wait, QueryStats, SearchDriver, SearchOutcome};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One discovered document reference
///
/// Uniquely identified by `(repository, path)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultRecord {
    /// Repository full name (`owner/name`)
    pub repository: String,

    /// Repository owner login
    pub owner: String,

    /// Path of the document within the repository
    pub path: String,

    /// Browser URL of the document
    pub html_url: String,

    /// Raw content URL hint, when one could be derived
    pub download_url: Option<String>,

    /// Size in bytes as reported by the search API
    pub size: u64,

    /// Content hash (blob SHA) reported by the search API
    pub sha: String,

    /// Set once a copy of the document exists in the download cache
    pub downloaded: bool,
}

impl SearchResultRecord {
    /// Returns the deduplication key
    pub fn key(&self) -> (&str, &str) {
        (&self.repository, &self.path)
    }
}

/// One page of search results
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Total matches the API reports for the whole query
    pub total_count: u64,

    /// Records on this page
    pub records: Vec<SearchResultRecord>,
}

/// Errors that can occur while querying the search API
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Rate limited until {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("Search API returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode search response: {0}")]
    Decode(String),
}

/// A code search backend
///
/// Implementations return one page of results per call and report throttling
/// as `SearchError::RateLimited`.
#[allow(async_fn_in_trait)]
pub trait CodeSearch {
    /// Fetches page `page` (1-based) of the results for `query`
    async fn search_page(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchPage, SearchError>;
}
