//! Polysearch CLI - multilingual hybrid search from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Search the corpora in the default data directory
//! polysearch "electric cars"
//! polysearch "coches eléctricos" --lang es -n 5
//! polysearch "query" --json
//!
//! # Custom corpora and ranking configuration
//! polysearch "query" --data-dir ./data --config ./polysearch.json
//!
//! # Show help
//! polysearch --help
//! ```

mod config;
mod output;
mod search;

use anyhow::Result;
use clap::Parser;
use polysearch_core::search::SearchError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Polysearch multilingual search CLI.
///
/// Ranks documents from every language corpus by a fused BM25 and semantic
/// score. Corpora are read from `docs_<lang>.json` files in the data
/// directory.
#[derive(Parser)]
#[command(name = "polysearch", version, about)]
struct Cli {
    /// Search query
    query: Option<String>,

    /// Maximum number of results to return (default: from config)
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Language of the query as an ISO 639-1 code (e.g. en, es, hi)
    #[arg(short, long)]
    lang: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Corpus data directory (default: platform standard location)
    #[arg(long, env = "POLYSEARCH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// JSON engine configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sentence embedding model directory (default: <data dir>/model)
    #[arg(long, env = "POLYSEARCH_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays clean
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Some(query) = cli.query else {
        eprintln!("No search query provided. Use --help for usage information.");
        std::process::exit(1);
    };

    let options = search::SearchOptions {
        query,
        limit: cli.limit,
        language: cli.lang,
        data_dir: cli.data_dir,
        config_path: cli.config,
        model_dir: cli.model_dir,
    };

    let response = match search::execute_search(&options).await {
        Ok(response) => response,
        Err(err) if matches!(err.downcast_ref(), Some(SearchError::EmptyQuery)) => {
            eprintln!("Empty query. Provide some text to search for.");
            std::process::exit(1);
        }
        Err(err) => return Err(err),
    };

    let output = if cli.json {
        output::format_json(&response)
    } else {
        output::format_human(&options.query, &response)
    };
    println!("{}", output);

    Ok(())
}
