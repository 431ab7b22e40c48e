//! tm-survey: a threat model corpus survey
//!
//! This crate discovers threat model documents through the GitHub code search API,
//! downloads their raw content into an on-disk cache, and runs a frequency analysis
//! over document headings and filenames.

pub mod analysis;
pub mod cache;
pub mod collector;
pub mod config;
pub mod logging;
pub mod output;
pub mod retrieval;
pub mod search;

use thiserror::Error;

/// Name of the environment variable holding the API credential
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Main error type for tm-survey operations
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "GITHUB_TOKEN is not set. Create a personal access token at \
         https://github.com/settings/tokens and export it as GITHUB_TOKEN"
    )]
    MissingCredential,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scan root does not exist: {0}")]
    MissingRoot(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for tm-survey operations
pub type Result<T> = std::result::Result<T, SurveyError>;

/// Reads the API credential from the process environment
///
/// A missing or blank value is fatal for the collection pipeline.
pub fn load_token() -> Result<String> {
    match std::env::var(TOKEN_ENV_VAR) {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(SurveyError::MissingCredential),
    }
}

// Re-export commonly used types
pub use config::Config;
pub use search::SearchResultRecord;
