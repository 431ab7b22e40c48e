//! Tracing subscriber setup shared by both binaries

use tracing_subscriber::EnvFilter;

/// Crate targets that follow the verbosity flags: the library and the analyzer binary
const CRATE_TARGETS: &[&str] = &["tm_survey", "tm_analyze"];

/// Builds the filter directive for the given flags
///
/// Both binaries log through their own crate target as well as the library's,
/// so every directive names both.
pub fn filter_directive(verbose: u8, quiet: bool) -> String {
    if quiet {
        return "error".to_string();
    }
    let (crate_level, default_level) = match verbose {
        0 => ("info", "warn"),
        1 => ("debug", "info"),
        2 => ("trace", "debug"),
        _ => return "trace".to_string(),
    };

    let mut directives: Vec<String> = CRATE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, crate_level))
        .collect();
    directives.push(default_level.to_string());
    directives.join(",")
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence when set and no verbosity flag was given.
/// Logs go to stderr so reports on stdout stay clean.
pub fn init(verbose: u8, quiet: bool) {
    let directive = filter_directive(verbose, quiet);
    let filter = if !quiet && verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive))
    } else {
        EnvFilter::new(&directive)
    };

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .try_init();
}
