//! Weighted keyword search over the local index.
//!
//! # Scoring
//!
//! The query is lowercased and split on whitespace into terms. For every
//! term, a comic earns the weight of each field whose lowercased text
//! contains the term as a substring:
//!
//! | Field | Weight |
//! |-------|--------|
//! | `title` | 10 |
//! | `safe_title` | 8 |
//! | `alt` | 5 |
//! | `transcript` | 3 |
//! | all four joined by spaces | 1 |
//!
//! The all-text check overlaps the field checks, so a title hit contributes
//! `10 + 1`. Existing result orderings depend on this, so it stays.
//!
//! Comics scoring zero are dropped. Results sort by score (desc), then
//! comic number (asc).

use anyhow::Result;

use crate::config::Config;
use crate::error::LookupError;
use crate::models::Comic;
use crate::store::{Index, IndexStore};

pub const TITLE_WEIGHT: u32 = 10;
pub const SAFE_TITLE_WEIGHT: u32 = 8;
pub const ALT_WEIGHT: u32 = 5;
pub const TRANSCRIPT_WEIGHT: u32 = 3;
pub const ALL_TEXT_WEIGHT: u32 = 1;

/// A comic that matched a query, with its relevance score (always ≥ 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub comic: &'a Comic,
    pub score: u32,
}

/// Lowercase `query` and split it into non-empty terms.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Score one comic against already-lowercased terms.
pub fn score_comic(comic: &Comic, terms: &[String]) -> u32 {
    let title = comic.title.to_lowercase();
    let safe_title = comic.safe_title.to_lowercase();
    let alt = comic.alt.to_lowercase();
    let transcript = comic.transcript.to_lowercase();
    let all_text = format!("{} {} {} {}", title, safe_title, alt, transcript);

    let weighted = [
        (title.as_str(), TITLE_WEIGHT),
        (safe_title.as_str(), SAFE_TITLE_WEIGHT),
        (alt.as_str(), ALT_WEIGHT),
        (transcript.as_str(), TRANSCRIPT_WEIGHT),
        (all_text.as_str(), ALL_TEXT_WEIGHT),
    ];

    terms
        .iter()
        .map(|term| {
            weighted
                .iter()
                .filter(|(text, _)| text.contains(term.as_str()))
                .map(|(_, weight)| weight)
                .sum::<u32>()
        })
        .sum()
}

/// Rank every comic in `index` against `query`.
///
/// Fails with [`LookupError::EmptyIndex`] when there is nothing to search.
/// A query with no terms matches nothing.
pub fn search_index<'a>(index: &'a Index, query: &str) -> Result<Vec<SearchHit<'a>>, LookupError> {
    if index.is_empty() {
        return Err(LookupError::EmptyIndex);
    }

    let terms = query_terms(query);
    if terms.is_empty() {
        return Ok(Vec::new());
    }

    let mut hits: Vec<SearchHit<'a>> = index
        .comics
        .values()
        .filter_map(|comic| {
            let score = score_comic(comic, &terms);
            (score > 0).then_some(SearchHit { comic, score })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.comic.num.cmp(&b.comic.num))
    });

    Ok(hits)
}

/// CLI entry point: search the configured index and print the top hits.
pub fn run_search(config: &Config, query: &str, limit: Option<usize>) -> Result<()> {
    let index = IndexStore::new(&config.index.path).load()?;
    let hits = search_index(&index, query)?;

    if hits.is_empty() {
        println!("No comics found matching '{}'", query);
        return Ok(());
    }

    let shown = limit
        .unwrap_or(config.search.max_results)
        .min(hits.len());

    println!("Found {} comics matching '{}':", hits.len(), query);
    println!();

    for (i, hit) in hits.iter().take(shown).enumerate() {
        println!(
            "{}. #{}: {} (score: {})",
            i + 1,
            hit.comic.num,
            hit.comic.title,
            hit.score
        );
        println!("   URL: {}", hit.comic.page_url(&config.remote.base_url));
        println!("   {}", hit.comic.alt);
        println!();
    }

    if hits.len() > shown {
        println!("... and {} more results", hits.len() - shown);
    }

    Ok(())
}
