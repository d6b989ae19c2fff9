//! Command-line interface definitions for News Harvest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The source and the sources file can also come from environment variables.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the News Harvest application.
///
/// # Examples
///
/// ```sh
/// # Query-mode source
/// news_harvest --source aktualne.cz -q "jaderná energie,atom"
///
/// # Date-mode source with a custom output file, deduplicated afterwards
/// news_harvest --source onet.pl --start-date 2024-05-01 --end-date 2024-05-07 \
///     -o data/raw/onet.json --dedupe
///
/// # Only deduplicate an existing file
/// news_harvest --dedupe-only -o data/raw/onet.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Source key, e.g. `aktualne.cz` (see --list-sources)
    #[arg(short, long, env = "NEWS_SOURCE")]
    pub source: Option<String>,

    /// Comma-separated search queries (query-mode sources)
    #[arg(short, long = "query", value_delimiter = ',')]
    pub queries: Vec<String>,

    /// First day to harvest, YYYY-MM-DD (date-mode sources)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last day to harvest, inclusive, YYYY-MM-DD (date-mode sources)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Output JSON file [default: data/raw/<source>_output.json]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for per-unit scratch files [default: the output's directory]
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,

    /// Remove duplicate URLs from the output after the run
    #[arg(long)]
    pub dedupe: bool,

    /// Skip harvesting and only deduplicate --output
    #[arg(long, conflicts_with_all = ["queries", "start_date", "end_date", "dedupe"])]
    pub dedupe_only: bool,

    /// YAML list of site configurations merged over the built-ins
    #[arg(long, env = "NEWS_SOURCES_FILE")]
    pub sources_file: Option<PathBuf>,

    /// Print the available sources and exit
    #[arg(long)]
    pub list_sources: bool,
}

impl Cli {
    /// Queries with surrounding whitespace trimmed and empty entries dropped.
    pub fn cleaned_queries(&self) -> Vec<String> {
        self.queries
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .map(str::to_owned)
            .collect()
    }
}
