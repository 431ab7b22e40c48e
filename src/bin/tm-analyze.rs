//! tm-analyze entry point
//!
//! Analyzes headings and filenames across a directory of downloaded documents.

use clap::Parser;
use std::path::{Path, PathBuf};
use tm_survey::analysis::{analyze_directory, print_report, write_dump};
use tm_survey::config::{load_config_or_default, CONFIG_FILE_NAME};
use tm_survey::logging;

/// tm-analyze: heading and filename frequency analysis
///
/// Walks the markdown files under ROOT, prints a ranked report and writes a
/// JSON dump to the working directory.
#[derive(Parser, Debug)]
#[command(name = "tm-analyze")]
#[command(version)]
#[command(about = "Analyze headings and filenames of downloaded documents", long_about = None)]
struct Cli {
    /// Directory to scan (defaults to the collection download directory)
    #[arg(value_name = "ROOT")]
    root: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.quiet);

    let (config, _) = load_config_or_default(Path::new(CONFIG_FILE_NAME))?;
    let root = cli.root.unwrap_or(config.output.download_dir);

    tracing::info!("Scanning {}", root.display());
    let stats = match analyze_directory(&root) {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Analysis failed: {}", e);
            return Err(e.into());
        }
    };

    print_report(&stats);

    write_dump(&stats, &config.output.analysis_path)?;
    println!("Wrote {}", config.output.analysis_path.display());

    Ok(())
}
