//! Raw content retrieval
//!
//! Downloads document bytes from the raw content host by trying an ordered list
//! of candidate branch labels until one succeeds.

mod fetcher;

pub use fetcher::{build_http_client, candidate_urls, FetchOutcome, RawFetcher, USER_AGENT};
