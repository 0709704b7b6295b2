//! Keyword relevance scoring over the flattened content corpus.
//!
//! # Scoring
//!
//! Matching is exact, case-insensitive substring containment. There is no
//! tokenization, stemming, or fuzzy matching.
//!
//! | Where the query occurs | Relevance |
//! |------------------------|-----------|
//! | title | 3 |
//! | summary or description | 2 |
//! | anywhere in the record's JSON form | 1 |
//!
//! Results are sorted by relevance (desc); the sort is stable, so equal
//! scores keep corpus order. The list is then truncated.

use anyhow::Result;

use crate::config::Config;
use crate::models::{ContentRecord, SearchOutcome, SearchResult};
use crate::provider::{self, SearchProvider};

pub const TITLE_RELEVANCE: u8 = 3;
pub const FIELD_RELEVANCE: u8 = 2;
pub const TEXT_RELEVANCE: u8 = 1;

/// Ranks `records` against `query`, returning at most `limit` results.
///
/// A blank query returns no results; every record contains the empty string.
pub fn search_content(records: &[ContentRecord], query: &str, limit: usize) -> Vec<SearchResult> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let query_lower = query.to_lowercase();
    let mut results: Vec<SearchResult> = records
        .iter()
        .filter_map(|record| score_record(record, &query_lower))
        .collect();

    results.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    results.truncate(limit);
    results
}

/// Scores one record. `query_lower` must already be lowercased.
pub fn score_record(record: &ContentRecord, query_lower: &str) -> Option<SearchResult> {
    let searchable = match serde_json::to_string(record) {
        Ok(s) => s.to_lowercase(),
        Err(e) => {
            tracing::warn!(id = %record.id(), error = %e, "record not searchable");
            return None;
        }
    };
    if !searchable.contains(query_lower) {
        return None;
    }

    let contains = |field: Option<&str>| {
        field
            .map(|text| text.to_lowercase().contains(query_lower))
            .unwrap_or(false)
    };

    let mut relevance = TEXT_RELEVANCE;
    let mut matched_text: Option<&str> = None;

    if contains(record.title()) {
        relevance = TITLE_RELEVANCE;
        matched_text = record.title();
    }
    if contains(record.summary()) {
        relevance = relevance.max(FIELD_RELEVANCE);
        matched_text = matched_text.or(record.summary());
    }
    if contains(record.description()) {
        relevance = relevance.max(FIELD_RELEVANCE);
        matched_text = matched_text.or(record.description());
    }

    let category = record.category();
    let title = record.display_title();
    let summary = record
        .summary()
        .or(record.description())
        .or(matched_text)
        .unwrap_or("");

    Some(SearchResult {
        id: record.id().to_string(),
        kind: category.as_str().to_string(),
        title: title.to_string(),
        summary: summary.to_string(),
        relevance: f64::from(relevance),
        citation: format!("{}: {}", category.label(), title),
        category: None,
        company: None,
        tags: None,
    })
}

/// CLI entry point for `portfolio search`.
pub async fn run_search(config: &Config, query: &str, local_only: bool) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let outcome = if local_only {
        provider::LocalKeywordProvider::new(config.clone())
            .search(query)
            .await?
    } else {
        provider::build_provider(config).search(query).await?
    };

    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &SearchOutcome) {
    if outcome.results.is_empty() {
        println!("No results.");
    }
    for (i, r) in outcome.results.iter().enumerate() {
        println!("{}. [{:.2}] {} ({})", i + 1, r.relevance, r.citation, r.id);
        if !r.summary.is_empty() {
            println!("    {}", r.summary);
        }
    }
    println!();
    println!("{}", outcome.response);
}
