//! Response extractors
//!
//! Pure functions from one LLM response to structured data that can be
//! aggregated across runs. Missing patterns are never an error: an
//! extractor that finds nothing returns an empty (or partial) result.
//!
//! | Extractor | Output | Used by stage |
//! |-----------|--------|---------------|
//! | [`EffectSizeExtractor`] | beta, p_value, r_squared, ... | `hunt_patterns`, `verify_claims` |
//! | [`CycleTimeExtractor`] | total_days, active_pct, ... | (workflow analysis) |
//! | [`QuoteMarkupExtractor`] | quote records | `mine_qual` |
//! | [`extract_claims`] | claim blocks | (claim verification reports) |

pub mod claims;
pub mod cycle_time;
pub mod effect_size;
pub mod quotes;
pub mod stage;

pub use claims::{ClaimRecord, extract_claims};
pub use cycle_time::CycleTimeExtractor;
pub use effect_size::EffectSizeExtractor;
pub use quotes::QuoteMarkupExtractor;
pub use stage::{Stage, StageExtractors};

use crate::quote::QuoteRecord;
use regex::Regex;
use std::collections::BTreeMap;

/// Metric name → value, as found in one response
pub type MetricMap = BTreeMap<String, f64>;

/// Extracts named numeric metrics from a response.
pub trait MetricExtractor: Send + Sync {
    /// Short identifier, e.g. `effect_sizes`
    fn name(&self) -> &'static str;

    fn extract(&self, response: &str) -> MetricMap;
}

/// Extracts attributed quotes from a response, in order of discovery.
pub trait QuoteExtractor: Send + Sync {
    /// Short identifier, e.g. `quotes`
    fn name(&self) -> &'static str;

    fn extract(&self, response: &str) -> Vec<QuoteRecord>;
}

/// A metric and its alternative patterns, tried in order.
///
/// Each pattern's first capture group must hold the number.
pub(crate) struct MetricRule {
    pub metric: &'static str,
    pub patterns: Vec<Regex>,
}

impl MetricRule {
    pub fn new<I, S>(metric: &'static str, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            metric,
            patterns: patterns.into_iter().map(|p| compile(p.as_ref())).collect(),
        }
    }

    /// First pattern that matches wins; later alternatives are not scanned.
    pub fn find(&self, response: &str) -> Option<f64> {
        self.patterns.iter().find_map(|pattern| {
            pattern
                .captures(response)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
        })
        .and_then(parse_number)
    }
}

/// Apply every rule to `response`.
pub(crate) fn apply_rules(rules: &[MetricRule], response: &str) -> MetricMap {
    rules
        .iter()
        .filter_map(|rule| rule.find(response).map(|v| (rule.metric.to_string(), v)))
        .collect()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Compile a built-in pattern. Patterns are literals covered by tests.
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_alternative_wins() {
        let rule = MetricRule::new(
            "beta",
            [r"(?i)beta\s*=\s*([\d.]+)", r"(?i)coef\s*=\s*([\d.]+)"],
        );
        assert_eq!(rule.find("coef = 0.9 and beta = 0.2"), Some(0.2));
        assert_eq!(rule.find("coef = 0.9"), Some(0.9));
        assert_eq!(rule.find("nothing"), None);
    }

    #[test]
    fn test_apply_rules_skips_missing_metrics() {
        let rules = vec![
            MetricRule::new("a", [r"a=(\d+)"]),
            MetricRule::new("b", [r"b=(\d+)"]),
        ];
        let found = apply_rules(&rules, "a=3");
        assert_eq!(found.len(), 1);
        assert_eq!(found["a"], 3.0);
    }
}
