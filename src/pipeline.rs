//! Run orchestration: discover, fetch, accumulate and persist, one unit at a time.
//!
//! A unit of work is one query (query-mode sources) or one calendar day
//! (date-mode sources). Each unit goes through the same steps:
//!
//! 1. Discover candidate links through the adapter
//! 2. Extract every link in discovery order, one request at a time
//! 3. Append the unit's records to the run accumulator
//! 4. Rewrite the output file with the whole accumulator
//!
//! Network failures and empty articles only drop the affected link. A failed
//! output write ends the run, since continuing would leave progress that is
//! not on disk. Writes run on tokio's blocking pool so the atomic
//! temp-file-and-rename sequence never stalls the runtime.

use crate::error::PersistError;
use crate::models::{ArticleRecord, Criterion, LinkRecord};
use crate::outputs::json::{write_articles, ScratchFiles};
use crate::scrapers::SourceAdapter;
use crate::utils::truncate_for_log;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use tracing::{debug, error, info, instrument, warn, Span};

/// Totals for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub units: usize,
    pub links: usize,
    pub records: usize,
    pub skipped: usize,
}

/// Drives one source adapter over a set of queries or a date range.
#[derive(Debug)]
pub struct Pipeline<A> {
    adapter: A,
    output: PathBuf,
    scratch_dir: PathBuf,
    accumulator: Vec<ArticleRecord>,
}

impl<A: SourceAdapter> Pipeline<A> {
    pub fn new(adapter: A, output: impl Into<PathBuf>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            adapter,
            output: output.into(),
            scratch_dir: scratch_dir.into(),
            accumulator: Vec::new(),
        }
    }

    /// Everything harvested so far, in unit then discovery order.
    pub fn records(&self) -> &[ArticleRecord] {
        &self.accumulator
    }

    /// Run one unit per query, in the order given.
    ///
    /// # Errors
    ///
    /// Stops at the first [`PersistError`]; units already written stay on disk.
    pub async fn run_queries(&mut self, queries: &[String]) -> Result<RunSummary, PersistError> {
        let mut summary = RunSummary::default();
        for query in queries {
            self.run_unit(Criterion::Query(query.clone()), &mut summary)
                .await?;
        }
        Ok(summary)
    }

    /// Run one unit per day from `start` to `end` inclusive, ascending.
    ///
    /// An `end` before `start` runs nothing.
    ///
    /// # Errors
    ///
    /// Stops at the first [`PersistError`]; days already written stay on disk.
    pub async fn run_dates(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RunSummary, PersistError> {
        let mut summary = RunSummary::default();
        for day in start.iter_days().take_while(|day| *day <= end) {
            self.run_unit(Criterion::Day(day), &mut summary).await?;
        }
        Ok(summary)
    }

    #[instrument(
        level = "info",
        skip_all,
        fields(source = %self.adapter.profile().source, unit = %criterion)
    )]
    async fn run_unit(
        &mut self,
        criterion: Criterion,
        summary: &mut RunSummary,
    ) -> Result<(), PersistError> {
        info!("Starting unit");
        let links = self.adapter.discover(&criterion).await;
        if links.is_empty() {
            warn!("No links discovered");
        }

        let scratch = ScratchFiles::new(&self.scratch_dir, &criterion);
        scratch.save_links(&criterion, &links);

        let records = harvest(&self.adapter, &criterion, &links).await;
        scratch.save_articles(&criterion, &records);

        let added = records.len();
        summary.units += 1;
        summary.links += links.len();
        summary.records += added;
        summary.skipped += links.len() - added;
        self.accumulator.extend(records);

        if let Err(e) = self.persist().await {
            error!(
                error = %e,
                links = %scratch.links_path().display(),
                articles = %scratch.articles_path().display(),
                "Failed to persist output; aborting run and keeping scratch files"
            );
            return Err(e);
        }
        scratch.cleanup();

        info!(
            links = links.len(),
            records = added,
            total = self.accumulator.len(),
            "Unit complete"
        );
        Ok(())
    }
}

impl<A> Pipeline<A> {
    /// Rewrite the output file on the blocking pool.
    ///
    /// The accumulator moves into the task and comes back with the result.
    async fn persist(&mut self) -> Result<(), PersistError> {
        let path = self.output.clone();
        let accumulator = std::mem::take(&mut self.accumulator);
        let span = Span::current();
        let task = tokio::task::spawn_blocking(move || {
            let result = span.in_scope(|| write_articles(&path, &accumulator));
            (accumulator, result)
        });
        match task.await {
            Ok((accumulator, result)) => {
                self.accumulator = accumulator;
                result
            }
            Err(e) => Err(PersistError::Task {
                path: self.output.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Extract every link sequentially and keep the ones with usable content.
async fn harvest<A: SourceAdapter>(
    adapter: &A,
    criterion: &Criterion,
    links: &[LinkRecord],
) -> Vec<ArticleRecord> {
    stream::iter(links)
        .then(|link| async move {
            match adapter.extract(&link.url).await {
                Ok(extract) => {
                    match ArticleRecord::assemble(adapter.profile(), criterion, link, extract) {
                        Some(record) => {
                            let headline = record.title.as_deref().or(record.header.as_deref());
                            debug!(
                                url = %link.url,
                                headline = %truncate_for_log(headline.unwrap_or_default(), 80),
                                "Harvested article"
                            );
                            Some(record)
                        }
                        None => {
                            warn!(url = %link.url, "No usable content; skipping");
                            None
                        }
                    }
                }
                Err(e) => {
                    warn!(url = %link.url, error = %e, "Extraction failed; skipping");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await
}
