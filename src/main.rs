//! # News Harvest
//!
//! A multi-source news article harvester. For one selected news site it
//! discovers candidate article URLs (from search results for a list of
//! queries, or from the archive for a range of days), extracts the headline,
//! publication date and body of each article, and accumulates the results
//! into a single JSON file that is rewritten after every unit of work.
//!
//! ## Features
//!
//! - Six built-in sources (Aktuálně.cz, Izvestia, Aktuality.sk, Ukrainska
//!   Pravda, Blikk and Onet), each described as data rather than code
//! - Extra or replacement sources from a YAML file (`--sources-file`)
//! - Crash-safe output: every write atomically replaces the previous file
//! - Optional post-run deduplication by article URL
//!
//! ## Usage
//!
//! ```sh
//! news_harvest --source iz.ru -q "атом,энергетика"
//! news_harvest --source blikk.hu --start-date 2024-05-01 --end-date 2024-05-03 --dedupe
//! ```
//!
//! ## Architecture
//!
//! 1. **Discovery**: walk the site's search or archive listing pages
//! 2. **Extraction**: fetch each article, one request at a time
//! 3. **Accumulation**: append usable records to the run accumulator
//! 4. **Persistence**: rewrite the output file after every query or day

use chrono::NaiveDate;
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod error;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use fetch::HttpFetcher;
use models::DiscoveryMode;
use outputs::dedupe::dedupe_file;
use pipeline::Pipeline;
use scrapers::config::SiteConfig;
use scrapers::engine::SiteScraper;
use scrapers::SourceAdapter;
use utils::{ensure_writable_dir, parent_dir};

/// What the selected source will be run over.
#[derive(Debug)]
enum Work {
    Queries(Vec<String>),
    Days { start: NaiveDate, end: NaiveDate },
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_harvest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let catalog = scrapers::load_catalog(args.sources_file.as_deref())?;

    if args.list_sources {
        print_sources(&catalog);
        return Ok(());
    }

    if args.dedupe_only {
        let output = args.output.ok_or("--dedupe-only requires --output")?;
        let report = dedupe_file(&output)?;
        info!(removed = report.removed_count(), kept = report.kept, "Deduplication finished");
        return Ok(());
    }

    let key = args
        .source
        .as_deref()
        .ok_or("--source is required (see --list-sources)")?;
    let site = scrapers::find_site(&catalog, key)?;
    let work = work_for(&site, &args)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(site.default_output_path()));
    let scratch_dir = args
        .scratch_dir
        .clone()
        .unwrap_or_else(|| parent_dir(&output).to_path_buf());

    // Early check: ensure output and scratch dirs are writable
    for dir in [parent_dir(&output), scratch_dir.as_path()] {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir.display(),
                error = %e,
                "Directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let fetcher = HttpFetcher::new(&site.user_agent, Duration::from_secs(site.timeout_secs))?;
    let scraper = SiteScraper::new(site, fetcher)?;
    info!(
        key = %scraper.config().key,
        source = %scraper.profile().source,
        country = %scraper.profile().country,
        mode = %scraper.mode(),
        output = %output.display(),
        "Source selected"
    );

    let mut pipeline = Pipeline::new(scraper, &output, &scratch_dir);
    let summary = match work {
        Work::Queries(queries) => pipeline.run_queries(&queries).await?,
        Work::Days { start, end } => pipeline.run_dates(start, end).await?,
    };
    info!(
        units = summary.units,
        links = summary.links,
        records = summary.records,
        skipped = summary.skipped,
        total = pipeline.records().len(),
        "Harvest complete"
    );

    if args.dedupe {
        let report = dedupe_file(&output)?;
        info!(removed = report.removed_count(), kept = report.kept, "Deduplication finished");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Check the CLI supplies what the source's mode needs.
fn work_for(site: &SiteConfig, args: &Cli) -> Result<Work, Box<dyn Error>> {
    match site.mode() {
        DiscoveryMode::ByQuery => {
            let queries = args.cleaned_queries();
            if queries.is_empty() {
                return Err(format!("{} searches by query; pass --query", site.key).into());
            }
            Ok(Work::Queries(queries))
        }
        DiscoveryMode::ByDate => {
            let (Some(start), Some(end)) = (args.start_date, args.end_date) else {
                return Err(format!(
                    "{} walks a date archive; pass --start-date and --end-date",
                    site.key
                )
                .into());
            };
            if end < start {
                return Err(format!("--end-date {end} is before --start-date {start}").into());
            }
            Ok(Work::Days { start, end })
        }
    }
}

fn print_sources(catalog: &[SiteConfig]) {
    for site in catalog {
        println!(
            "{:<16} {:<14} {}",
            site.profile.country,
            site.key,
            site.mode()
        );
    }
}
