///! Language usage aggregation across repositories

use std::collections::HashMap;
use streak_common::{LanguageAggregate, Repository, DEFAULT_LANGUAGE_COLOR};

/// Languages kept on the card
pub const DEFAULT_TOP_LANGUAGES: usize = 5;

#[derive(Debug, Clone)]
struct TallyEntry {
    name: String,
    color: Option<String>,
    size: u64,
}

/// Per-language byte totals, kept in first-seen order
///
/// The color recorded for a language is whatever its first edge carried,
/// including none; later edges only add to the size.
#[derive(Debug, Clone, Default)]
pub struct LanguageTally {
    entries: Vec<TallyEntry>,
    index: HashMap<String, usize>,
}

impl LanguageTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, color: Option<&str>, size: u64) {
        match self.index.get(name) {
            Some(&pos) => {
                self.entries[pos].size += size;
            }
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push(TallyEntry {
                    name: name.to_string(),
                    color: color.map(str::to_string),
                    size,
                });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }

    /// Convert into aggregates ranked by size; ties keep first-seen order
    pub fn into_ranked(self) -> Vec<LanguageAggregate> {
        let total = self.total_size();
        if total == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<LanguageAggregate> = self
            .entries
            .into_iter()
            .map(|entry| LanguageAggregate {
                percentage: round2(entry.size as f64 / total as f64 * 100.0),
                color: entry
                    .color
                    .unwrap_or_else(|| DEFAULT_LANGUAGE_COLOR.to_string()),
                name: entry.name,
                total_size_bytes: entry.size,
            })
            .collect();

        // sort_by is stable
        ranked.sort_by(|a, b| b.total_size_bytes.cmp(&a.total_size_bytes));
        ranked
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Every language across all repositories, ranked, with percentages of the full total
pub fn aggregate_all_languages(repositories: &[Repository]) -> Vec<LanguageAggregate> {
    let mut tally = LanguageTally::new();
    for repo in repositories {
        for edge in &repo.languages {
            tally.add(&edge.language_name, edge.color.as_deref(), edge.size_bytes);
        }
    }
    tally.into_ranked()
}

/// Top `top_n` languages; percentages still refer to the untruncated total
pub fn aggregate_languages(repositories: &[Repository], top_n: usize) -> Vec<LanguageAggregate> {
    let mut ranked = aggregate_all_languages(repositories);
    ranked.truncate(top_n);
    ranked
}
