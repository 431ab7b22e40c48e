//! HTTP fetcher implementation
//!
//! This module handles raw content requests, including:
//! - Building HTTP clients with a descriptive user agent
//! - Expanding one search record into candidate raw URLs
//! - Short-circuiting on the first successful candidate
//!
//! Failures are never raised to the caller; they collapse into
//! `FetchOutcome::Exhausted`.

use crate::config::RetrievalConfig;
use crate::search::SearchResultRecord;
use reqwest::Client;
use std::time::Duration;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/topics/threat-modeling)"
);

/// Result of a retrieval attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A candidate returned a success status
    Found {
        /// The branch label that served the content
        branch: String,
        /// Document bytes
        body: Vec<u8>,
    },

    /// Every candidate failed
    Exhausted {
        /// One entry per failed candidate, in attempt order
        attempts: Vec<String>,
    },
}

impl FetchOutcome {
    /// Returns true if content was retrieved
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Builds an HTTP client with the crate user agent and a per-request timeout
///
/// # Arguments
///
/// * `timeout` - Total time allowed for one request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Expands a record into `<base>/<repository>/<branch>/<path>` URLs, one per branch
pub fn candidate_urls(base_url: &str, record: &SearchResultRecord, branches: &[String]) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    let path = record.path.trim_start_matches('/');
    branches
        .iter()
        .map(|branch| format!("{}/{}/{}/{}", base, record.repository, branch, path))
        .collect()
}

/// Fetches raw document content with branch fallback
pub struct RawFetcher {
    client: Client,
    base_url: String,
    branches: Vec<String>,
    token: String,
}

impl RawFetcher {
    /// Creates a fetcher from the retrieval settings and the API credential
    pub fn new(config: &RetrievalConfig, token: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(Duration::from_secs(config.timeout_secs))?,
            base_url: config.raw_url.clone(),
            branches: config.branches.clone(),
            token: token.to_string(),
        })
    }

    /// Tries each candidate branch in order and returns the first success
    ///
    /// No verification is made against the record's content hash.
    pub async fn fetch(&self, record: &SearchResultRecord) -> FetchOutcome {
        let urls = candidate_urls(&self.base_url, record, &self.branches);
        let mut attempts = Vec::with_capacity(urls.len());

        for (branch, url) in self.branches.iter().zip(urls) {
            match self.try_candidate(&url).await {
                Ok(body) => {
                    tracing::debug!("Fetched {} from branch {}", record.path, branch);
                    return FetchOutcome::Found {
                        branch: branch.clone(),
                        body,
                    };
                }
                Err(reason) => {
                    tracing::trace!("Candidate {} failed: {}", url, reason);
                    attempts.push(format!("{}: {}", branch, reason));
                }
            }
        }

        FetchOutcome::Exhausted { attempts }
    }

    async fn try_candidate(&self, url: &str) -> Result<Vec<u8>, String> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(classify_error)
    }
}

fn classify_error(e: reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    }
}
