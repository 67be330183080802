//! Incremental index builder.
//!
//! Coordinates the update flow: load the snapshot, ask the remote for the
//! latest comic, fetch every missing number in between one at a time, and
//! persist the result.
//!
//! # Range and resumption
//!
//! The fetch range is `[last_num + 1, latest]` (or `[1, latest]` for a fresh
//! index). Within that range a number is fetched only if the map does not
//! already hold it, so a run that was interrupted after a checkpoint picks
//! up where it left off even when `last_num` lags behind the map.
//!
//! # Failure policy
//!
//! A failed or empty fetch is logged and skipped; it never aborts the run.
//! Skipped numbers below the final `last_num` are not retried by later runs.
//! Checkpoint saves that fail are logged and the run continues. Failing to
//! load the index, to discover the latest comic, or to write the final
//! snapshot is fatal.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::config::{Config, SyncConfig};
use crate::fetch::{ComicId, ComicSource, HttpFetcher};
use crate::models::Comic;
use crate::progress::{ProgressMode, SyncProgressEvent, SyncProgressReporter};
use crate::store::IndexStore;

/// Pacing and checkpoint settings for one update run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Pause after every fetch attempt.
    pub request_delay: Duration,
    /// Save a checkpoint after this many successful fetches.
    pub checkpoint_every: usize,
}

impl From<&SyncConfig> for SyncOptions {
    fn from(cfg: &SyncConfig) -> Self {
        Self {
            request_delay: Duration::from_millis(cfg.request_delay_ms),
            checkpoint_every: cfg.checkpoint_every.max(1),
        }
    }
}

/// Outcome of an update run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub latest_num: u32,
    pub latest_title: String,
    /// First number considered by this run.
    pub start: u32,
    /// Numbers in range that were absent from the index.
    pub missing: usize,
    pub fetched: usize,
    pub failed: Vec<u32>,
    pub checkpoints: usize,
    /// Comics in the index after the run.
    pub total_indexed: usize,
    /// True when nothing needed fetching.
    pub up_to_date: bool,
}

/// Bring the snapshot behind `store` up to date with `source`.
pub fn update_index(
    source: &dyn ComicSource,
    store: &IndexStore,
    options: &SyncOptions,
    progress: &dyn SyncProgressReporter,
) -> Result<SyncSummary> {
    info!(path = %store.path().display(), "loading existing index");
    let mut index = store.load().context("failed to load index")?;

    progress.report(SyncProgressEvent::Discovering);
    let latest = source
        .fetch(ComicId::Latest)
        .context("failed to fetch latest comic")?;
    if latest.num == 0 {
        bail!("latest comic payload carries no comic number");
    }
    info!("latest comic: #{} - {}", latest.num, latest.title);

    let start = index.fetch_start();
    let range = index.pending_range(latest.num);
    let missing = range
        .clone()
        .map_or(0, |range| index.missing_count(range));

    let mut summary = SyncSummary {
        latest_num: latest.num,
        latest_title: latest.title.clone(),
        start,
        missing,
        fetched: 0,
        failed: Vec::new(),
        checkpoints: 0,
        total_indexed: index.len(),
        up_to_date: missing == 0,
    };

    let range = match range {
        Some(range) if missing > 0 => range,
        _ => {
            if latest.num > index.last_num {
                index.last_num = latest.num;
                index.updated = Some(Utc::now());
                store.save(&index).context("failed to save index")?;
            }
            info!("index is already up to date");
            return Ok(summary);
        }
    };

    info!("need to fetch {} comics starting at #{}", missing, start);
    let total = missing as u64;
    let mut n = 0u64;

    for num in range {
        if index.contains(num) {
            continue;
        }
        n += 1;
        progress.report(SyncProgressEvent::Fetching { num, n, total });

        match fetch_comic(source, num) {
            Ok(comic) => {
                index.insert(comic);
                summary.fetched += 1;

                if summary.fetched % options.checkpoint_every == 0 {
                    index.last_num = num;
                    index.updated = Some(Utc::now());
                    match store.save(&index) {
                        Ok(()) => {
                            summary.checkpoints += 1;
                            info!(fetched = summary.fetched, "checkpoint saved at #{}", num);
                            progress.report(SyncProgressEvent::Checkpoint {
                                fetched: summary.fetched as u64,
                                total,
                            });
                        }
                        Err(e) => warn!("failed to save progress: {}", e),
                    }
                }
            }
            Err(e) => {
                warn!("failed to fetch comic #{}: {:#}", num, e);
                summary.failed.push(num);
            }
        }

        if !options.request_delay.is_zero() {
            std::thread::sleep(options.request_delay);
        }
    }

    index.last_num = index.last_num.max(latest.num);
    index.updated = Some(Utc::now());
    info!("saving index with {} comics", index.len());
    store.save(&index).context("failed to save index")?;

    summary.total_indexed = index.len();
    Ok(summary)
}

/// Fetch one numbered comic, rejecting payloads that don't describe it.
fn fetch_comic(source: &dyn ComicSource, num: u32) -> Result<Comic> {
    let id = ComicId::number(num).ok_or_else(|| anyhow!("comic number must be positive"))?;
    let comic = source.fetch(id)?;
    if comic.num == 0 {
        bail!("comic does not exist (empty payload)");
    }
    if comic.num != num {
        bail!("payload describes comic #{} instead", comic.num);
    }
    Ok(comic)
}

/// CLI entry point: update the configured index from the remote API.
pub fn run_update(config: &Config, mode: ProgressMode) -> Result<()> {
    let fetcher = HttpFetcher::new(&config.remote)?;
    let store = IndexStore::new(&config.index.path);
    let options = SyncOptions::from(&config.sync);
    let reporter = mode.reporter();

    let summary = update_index(&fetcher, &store, &options, reporter.as_ref())?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &SyncSummary) {
    println!("update");
    println!(
        "  latest comic: #{} - {}",
        summary.latest_num, summary.latest_title
    );
    if summary.up_to_date {
        println!("  Index is already up to date.");
    } else {
        println!("  missing: {}", summary.missing);
        println!("  fetched: {} new comics", summary.fetched);
        if !summary.failed.is_empty() {
            let nums: Vec<String> = summary.failed.iter().map(|n| format!("#{}", n)).collect();
            println!("  failed: {} ({})", summary.failed.len(), nums.join(", "));
        }
        println!("  checkpoints: {}", summary.checkpoints);
    }
    println!("  indexed: {} comics", summary.total_indexed);
    println!("ok");
}
