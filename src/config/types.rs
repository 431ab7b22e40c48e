use serde::Deserialize;
use std::path::PathBuf;

/// Search queries issued when no config file overrides them
pub const DEFAULT_QUERIES: &[&str] = &[
    "filename:threat_model.md",
    "filename:threat-model.md",
    "filename:threatmodel.md",
    "filename:THREAT_MODEL.md",
    "filename:THREAT-MODEL.md",
    "filename:threat_modeling.md",
    "filename:threat-modeling.md",
    "filename:threat_model extension:md",
    "filename:threat-model extension:md",
    "\"threat model\" in:path extension:md",
    "\"STRIDE\" \"threat model\" extension:md",
];

/// Main configuration structure for tm-survey
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub retrieval: RetrievalConfig,
    pub output: OutputConfig,
}

/// Code search behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    /// Ordered list of query strings
    pub queries: Vec<String>,

    /// Base URL of the search API
    pub api_url: String,

    /// Results requested per page (the API allows at most 100)
    pub per_page: u32,

    /// Hard cap on results the API will return for one query
    pub max_results: u32,

    /// Courtesy pause after each completed query (milliseconds)
    pub query_delay_ms: u64,

    /// Seconds added to the server's rate-limit reset time before retrying
    pub rate_limit_margin_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            queries: DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect(),
            api_url: "https://api.github.com".to_string(),
            per_page: 100,
            max_results: 1000,
            query_delay_ms: 1000,
            rate_limit_margin_secs: 5,
        }
    }
}

/// Raw content retrieval behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetrievalConfig {
    /// Base URL of the raw content host
    pub raw_url: String,

    /// Candidate branch labels, tried in order
    pub branches: Vec<String>,

    /// Per-attempt network timeout (seconds)
    pub timeout_secs: u64,

    /// Courtesy pause after each download attempt (milliseconds)
    pub download_delay_ms: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            raw_url: "https://raw.githubusercontent.com".to_string(),
            branches: vec!["HEAD".to_string(), "main".to_string(), "master".to_string()],
            timeout_secs: 10,
            download_delay_ms: 100,
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory receiving the record dumps and the run summary
    pub output_dir: PathBuf,

    /// Root of the downloaded document cache
    pub download_dir: PathBuf,

    /// Analyzer JSON document, relative to the working directory
    pub analysis_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("threat_models_data"),
            download_dir: PathBuf::from("threat_models_data/downloads"),
            analysis_path: PathBuf::from("heading_analysis.json"),
        }
    }
}
