//! Statistics for a finished harvest
//!
//! This module summarizes a set of records (and, when available, the run
//! that produced them) for display at the end of a harvest.

use crate::crawler::Harvest;
use crate::record::Record;
use crate::state::StopReason;
use std::collections::{HashMap, HashSet};

/// How many tags and authors the summary lists
const TOP_N: usize = 5;

/// Harvest statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestStatistics {
    /// Number of pages fetched (unknown when read back from a CSV)
    pub pages_visited: Option<usize>,

    /// Why the run stopped (unknown when read back from a CSV)
    pub stop_reason: Option<StopReason>,

    /// Total number of records
    pub total_records: usize,

    /// Number of distinct authors
    pub unique_authors: usize,

    /// Number of distinct tags
    pub unique_tags: usize,

    /// Records with no tags at all
    pub untagged_records: usize,

    /// Most frequent tags, most common first
    pub top_tags: Vec<(String, usize)>,

    /// Most quoted authors, most common first
    pub top_authors: Vec<(String, usize)>,
}

impl HarvestStatistics {
    /// Builds statistics for a completed run
    pub fn from_harvest(harvest: &Harvest) -> Self {
        Self {
            pages_visited: Some(harvest.pages_visited),
            stop_reason: Some(harvest.stop_reason),
            ..Self::from_records(&harvest.records)
        }
    }

    /// Builds statistics from records alone
    pub fn from_records(records: &[Record]) -> Self {
        let mut tag_counts: HashMap<&str, usize> = HashMap::new();
        let mut author_counts: HashMap<&str, usize> = HashMap::new();

        for record in records {
            *author_counts.entry(record.author()).or_default() += 1;

            // Count each tag once per record
            let distinct: HashSet<&str> = record.tags().iter().map(String::as_str).collect();
            for tag in distinct {
                *tag_counts.entry(tag).or_default() += 1;
            }
        }

        Self {
            pages_visited: None,
            stop_reason: None,
            total_records: records.len(),
            unique_authors: author_counts.len(),
            unique_tags: tag_counts.len(),
            untagged_records: records.iter().filter(|r| r.tags().is_empty()).count(),
            top_tags: top_entries(tag_counts),
            top_authors: top_entries(author_counts),
        }
    }
}

/// Sorts by count descending, then name ascending, and keeps the first few
fn top_entries(counts: HashMap<&str, usize>) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(TOP_N);
    entries
}

/// Prints statistics to stdout in a human-readable format
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Quote-Harvest Statistics ===\n");

    if let Some(pages) = stats.pages_visited {
        println!("Pages visited: {}", pages);
    }
    if let Some(reason) = stats.stop_reason {
        println!("Stopped because: {}", reason.description());
    }
    println!("Total quotes: {}", stats.total_records);
    println!("Unique authors: {}", stats.unique_authors);
    println!("Unique tags: {}", stats.unique_tags);
    println!("Quotes without tags: {}", stats.untagged_records);

    if !stats.top_authors.is_empty() {
        println!("\nTop authors:");
        for (author, count) in &stats.top_authors {
            println!("  {:>4}  {}", count, author);
        }
    }

    if !stats.top_tags.is_empty() {
        println!("\nTop tags:");
        for (tag, count) in &stats.top_tags {
            println!("  {:>4}  {}", count, tag);
        }
    }
}
