//! tm-survey main entry point
//!
//! Runs the collection pipeline: search, deduplicate, download, persist.

use clap::Parser;
use std::path::Path;
use tm_survey::collector::run_collection;
use tm_survey::config::{load_config_or_default, CONFIG_FILE_NAME};
use tm_survey::output::format_summary;
use tm_survey::{load_token, logging};

/// tm-survey: collect threat model documents from GitHub
///
/// Runs a fixed list of code search queries, downloads every match into a
/// local cache and writes JSON, CSV and plain-text summaries. Requires
/// GITHUB_TOKEN in the environment. Settings can be overridden with an
/// optional tm-survey.toml in the working directory.
#[derive(Parser, Debug)]
#[command(name = "tm-survey")]
#[command(version)]
#[command(about = "Collect threat model documents from GitHub", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.quiet);

    let token = match load_token() {
        Ok(token) => token,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let (config, config_hash) = match load_config_or_default(Path::new(CONFIG_FILE_NAME)) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    match config_hash {
        Some(hash) => tracing::info!("Loaded {} (hash: {})", CONFIG_FILE_NAME, hash),
        None => tracing::info!("Using built-in configuration"),
    }

    tracing::info!(
        "Output directory: {}, downloads: {}",
        config.output.output_dir.display(),
        config.output.download_dir.display()
    );

    match run_collection(config, &token).await {
        Ok(report) => {
            println!("{}", format_summary(&report.summary));
            if report.failed_queries > 0 {
                println!(
                    "{} of {} queries ended early; see the log for details",
                    report.failed_queries, report.queries
                );
            }
            for artifact in &report.artifacts {
                println!("Wrote {}", artifact.display());
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Collection failed: {}", e);
            Err(e.into())
        }
    }
}
