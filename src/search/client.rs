//! GitHub code search client
//!
//! Issues `GET /search/code` requests and maps throttling responses to
//! `SearchError::RateLimited` carrying the server's reset time.

use crate::retrieval::build_http_client;
use crate::search::{CodeSearch, SearchError, SearchPage, SearchResultRecord};
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Timeout for one search request
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body kept in `SearchError::Http`
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Deserialize)]
struct ApiSearchResponse {
    total_count: u64,
    #[serde(default)]
    incomplete_results: bool,
    #[serde(default)]
    items: Vec<ApiCodeItem>,
}

#[derive(Debug, Deserialize)]
struct ApiCodeItem {
    path: String,
    #[serde(default)]
    sha: String,
    html_url: String,
    #[serde(default)]
    download_url: Option<String>,
    #[serde(default)]
    size: Option<u64>,
    repository: ApiRepository,
}

#[derive(Debug, Deserialize)]
struct ApiRepository {
    full_name: String,
    owner: ApiOwner,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    login: String,
}

impl From<ApiCodeItem> for SearchResultRecord {
    fn from(item: ApiCodeItem) -> Self {
        let download_url = item.download_url.or_else(|| raw_url_hint(&item.html_url));
        Self {
            repository: item.repository.full_name,
            owner: item.repository.owner.login,
            path: item.path,
            html_url: item.html_url,
            download_url,
            size: item.size.unwrap_or(0),
            sha: item.sha,
            downloaded: false,
        }
    }
}

/// Code search backed by the GitHub REST API
pub struct GithubSearch {
    client: Client,
    api_url: String,
    token: String,
}

impl GithubSearch {
    /// Creates a client for the API rooted at `api_url`
    pub fn new(api_url: &str, token: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(SEARCH_TIMEOUT)?,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }
}

impl CodeSearch for GithubSearch {
    async fn search_page(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchPage, SearchError> {
        let response = self
            .client
            .get(format!("{}/search/code", self.api_url))
            .query(&[
                ("q", query.to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            if let Some(reset_at) = rate_limit_reset(response.headers(), Utc::now()) {
                return Err(SearchError::RateLimited { reset_at });
            }
        }

        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            if message.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| message.is_char_boundary(i))
                    .unwrap_or(0);
                message.truncate(cut);
            }
            return Err(SearchError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: ApiSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        if body.incomplete_results {
            tracing::debug!("Search for '{}' page {} reported incomplete results", query, page);
        }

        Ok(SearchPage {
            total_count: body.total_count,
            records: body.items.into_iter().map(SearchResultRecord::from).collect(),
        })
    }
}

/// Reads the rate-limit reset time from a throttled response's headers
///
/// Returns `None` when the headers do not describe a rate limit (a plain 403).
/// `x-ratelimit-reset` (epoch seconds) wins over `retry-after` (seconds from now);
/// a throttle with neither resets immediately.
pub fn rate_limit_reset(headers: &HeaderMap, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    let remaining = header_str("x-ratelimit-remaining").and_then(|v| v.trim().parse::<u64>().ok());
    let retry_after = header_str("retry-after").and_then(|v| v.trim().parse::<i64>().ok());
    let reset = header_str("x-ratelimit-reset").and_then(|v| v.trim().parse::<i64>().ok());

    if remaining != Some(0) && retry_after.is_none() {
        return None;
    }

    if let Some(reset_at) = reset.and_then(|secs| Utc.timestamp_opt(secs, 0).single()) {
        return Some(reset_at);
    }

    match retry_after {
        Some(secs) => Some(now + ChronoDuration::seconds(secs.max(0))),
        None => Some(now),
    }
}

/// Derives a raw content URL from a `github.com/<repo>/blob/<ref>/<path>` URL
pub fn raw_url_hint(html_url: &str) -> Option<String> {
    let rest = html_url.strip_prefix("https://github.com/")?;
    let (repo, tail) = rest.split_once("/blob/")?;
    Some(format!("https://raw.githubusercontent.com/{}/{}", repo, tail))
}
