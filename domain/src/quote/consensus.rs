//! Quote aggregation across consensus runs

use super::record::QuoteRecord;
use crate::core::string::collapse_whitespace;
use crate::stability::StabilityRating;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Appearance-rate thresholds for quotes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteThresholds {
    /// Rate at or above this is `High`
    pub high_rate: f64,
    /// Rate at or above this (and not high) is `Medium`
    pub medium_rate: f64,
}

impl Default for QuoteThresholds {
    fn default() -> Self {
        Self {
            high_rate: 0.75,
            medium_rate: 0.50,
        }
    }
}

impl QuoteThresholds {
    pub fn new(high_rate: f64, medium_rate: f64) -> Self {
        Self {
            high_rate,
            medium_rate,
        }
    }

    /// Rate an appearance fraction. Quotes are never `Unknown`.
    pub fn classify(&self, appearance_rate: f64) -> StabilityRating {
        if appearance_rate >= self.high_rate {
            StabilityRating::High
        } else if appearance_rate >= self.medium_rate {
            StabilityRating::Medium
        } else {
            StabilityRating::Low
        }
    }
}

/// Stability of one quote across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteConsensus {
    /// Display text, as first seen
    pub text: String,
    pub informant: String,
    pub context: String,
    /// Number of runs that extracted this quote at least once
    pub appearances: usize,
    pub total_runs: usize,
    pub appearance_rate: f64,
    pub stability: StabilityRating,
    /// Grouping key; never displayed
    #[serde(skip)]
    pub normalized: String,
}

impl QuoteConsensus {
    /// `appearances/total_runs`, e.g. `3/4`
    pub fn fraction(&self) -> String {
        format!("{}/{}", self.appearances, self.total_runs)
    }
}

/// Grouping key for quote text: lowercased, whitespace collapsed.
pub fn normalize_quote(text: &str) -> String {
    collapse_whitespace(&text.to_lowercase())
}

struct Tally<'a> {
    first: &'a QuoteRecord,
    normalized: String,
    count: usize,
}

/// Aggregate per-run quote lists into [`QuoteConsensus`] entries.
///
/// `all_quotes[i]` holds the quotes extracted from run `i`. A quote counts
/// at most once per run; quotes with empty normalized text are ignored. The
/// result is sorted by descending appearance rate, ties in first-seen order.
pub fn aggregate_quotes(
    all_quotes: &[Vec<QuoteRecord>],
    total_runs: usize,
    thresholds: &QuoteThresholds,
) -> Vec<QuoteConsensus> {
    if total_runs == 0 {
        return Vec::new();
    }

    let mut tallies: Vec<Tally<'_>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for run_quotes in all_quotes {
        let mut seen_in_run: HashSet<String> = HashSet::new();
        for quote in run_quotes {
            let normalized = normalize_quote(&quote.text);
            if normalized.is_empty() || !seen_in_run.insert(normalized.clone()) {
                continue;
            }

            match index.get(&normalized) {
                Some(&i) => tallies[i].count += 1,
                None => {
                    index.insert(normalized.clone(), tallies.len());
                    tallies.push(Tally {
                        first: quote,
                        normalized,
                        count: 1,
                    });
                }
            }
        }
    }

    let mut results: Vec<QuoteConsensus> = tallies
        .into_iter()
        .map(|tally| {
            let rate = tally.count as f64 / total_runs as f64;
            QuoteConsensus {
                text: tally.first.text.clone(),
                informant: tally.first.informant.clone(),
                context: tally.first.context.clone(),
                appearances: tally.count,
                total_runs,
                appearance_rate: rate,
                stability: thresholds.classify(rate),
                normalized: tally.normalized,
            }
        })
        .collect();

    // Vec::sort_by is stable, so ties keep first-seen order
    results.sort_by(|a, b| b.appearance_rate.total_cmp(&a.appearance_rate));
    results
}
