//! Index statistics.
//!
//! Provides a quick summary of what's indexed: comic count, sync position,
//! last update time, and a sample of the oldest and newest comics. Used by
//! `xkcd stats` to confirm that updates are landing.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::store::{Index, IndexStore};

const SAMPLE_SIZE: usize = 5;

/// Summary of an index, with samples in ascending comic-number order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub total: usize,
    pub last_num: u32,
    pub updated: Option<DateTime<Utc>>,
    /// The lowest-numbered comics.
    pub first: Vec<(u32, String)>,
    /// The highest-numbered comics; empty unless the index holds more than
    /// twice the sample size.
    pub last: Vec<(u32, String)>,
}

impl IndexStats {
    pub fn from_index(index: &Index) -> Self {
        let nums = index.sorted_numbers();
        let sample = |nums: &[u32]| -> Vec<(u32, String)> {
            nums.iter()
                .filter_map(|n| index.get(*n).map(|c| (*n, c.title.clone())))
                .collect()
        };

        let first = sample(&nums[..nums.len().min(SAMPLE_SIZE)]);
        let last = if nums.len() > SAMPLE_SIZE * 2 {
            sample(&nums[nums.len() - SAMPLE_SIZE..])
        } else {
            Vec::new()
        };

        Self {
            total: index.len(),
            last_num: index.last_num,
            updated: index.updated,
            first,
            last,
        }
    }
}

/// Run the stats command: load the index and print a summary.
pub fn run_stats(config: &Config) -> Result<()> {
    let store = IndexStore::new(&config.index.path);
    let index = store.load()?;
    let stats = IndexStats::from_index(&index);

    let file_size = std::fs::metadata(store.path())
        .map(|m| m.len())
        .unwrap_or(0);

    println!("XKCD Index Statistics");
    println!("═══════════════════════");
    println!("Index file:           {}", store.path().display());
    println!("Size:                 {}", format_bytes(file_size));
    println!("Total comics indexed: {}", stats.total);
    println!("Last comic number:    {}", stats.last_num);
    println!(
        "Last updated:         {}",
        match stats.updated {
            Some(ts) => format!(
                "{} ({})",
                ts.format("%Y-%m-%d %H:%M:%S"),
                format_ts_relative(ts)
            ),
            None => "never".to_string(),
        }
    );

    if !stats.first.is_empty() {
        println!();
        println!("Sample comics:");
        for (num, title) in &stats.first {
            println!("  #{}: {}", num, title);
        }
        if !stats.last.is_empty() {
            println!("  ...");
            for (num, title) in &stats.last {
                println!("  #{}: {}", num, title);
            }
        }
    }

    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Format a timestamp as a relative time string (e.g. "3 hours ago").
fn format_ts_relative(ts: DateTime<Utc>) -> String {
    let delta = (Utc::now() - ts).num_seconds();

    if delta < 0 {
        "in the future".to_string()
    } else if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    }
}
