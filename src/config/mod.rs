//! Configuration module for tm-survey
//!
//! Every setting has a built-in default, so the collection pipeline runs without
//! arguments. An optional TOML file overrides any subset of the defaults.
//!
//! # Example
//!
//! ```no_run
//! use tm_survey::config::load_config_or_default;
//! use std::path::Path;
//!
//! let (config, _hash) = load_config_or_default(Path::new("tm-survey.toml")).unwrap();
//! println!("Running {} search queries", config.search.queries.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, RetrievalConfig, SearchConfig, DEFAULT_QUERIES};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_or_default, CONFIG_FILE_NAME};
pub use validation::validate;
