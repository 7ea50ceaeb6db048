//! Consolidated result of one consensus request

use super::aggregate::overall_stability;
use crate::core::model::Model;
use crate::core::string::preview;
use crate::quote::QuoteConsensus;
use crate::stability::{MetricConsensus, StabilityRating, StabilitySummary, format_cv_percent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Characters of quote text shown in a flag.
const FLAG_PREVIEW_CHARS: usize = 50;

/// One successful provider call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRun {
    pub text: String,
    pub tokens: u64,
}

impl RawRun {
    pub fn new(text: impl Into<String>, tokens: u64) -> Self {
        Self {
            text: text.into(),
            tokens,
        }
    }
}

/// Everything a consensus request produced. Self-describing: rendering it
/// needs no further lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub raw_responses: Vec<String>,
    /// Number of successful runs
    pub n_runs: usize,
    pub metrics: BTreeMap<String, MetricConsensus>,
    /// Present only when a quote extractor was used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quotes: Option<Vec<QuoteConsensus>>,
    pub overall_stability: StabilityRating,
    pub flagged_items: Vec<String>,
    pub model: Model,
    pub total_tokens: u64,
    pub execution_time_seconds: f64,
    pub estimated_cost_usd: f64,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl ConsensusResult {
    /// Assemble the result from successful runs and their aggregates.
    ///
    /// Derives the overall rating, the flagged items, token total and cost.
    pub fn assemble(
        runs: Vec<RawRun>,
        metrics: BTreeMap<String, MetricConsensus>,
        quotes: Option<Vec<QuoteConsensus>>,
        model: Model,
        elapsed: Duration,
    ) -> Self {
        let quote_slice = quotes.as_deref().unwrap_or_default();
        let overall = overall_stability(metrics.values(), quote_slice);

        let flagged_items = metrics
            .values()
            .filter(|m| m.stability.is_low())
            .map(metric_flag)
            .chain(
                quote_slice
                    .iter()
                    .filter(|q| q.stability.is_low())
                    .map(quote_flag),
            )
            .collect();

        let total_tokens = runs.iter().map(|r| r.tokens).sum();
        let estimated_cost_usd = model.estimate_cost(total_tokens);

        Self {
            n_runs: runs.len(),
            raw_responses: runs.into_iter().map(|r| r.text).collect(),
            metrics,
            quotes,
            overall_stability: overall,
            flagged_items,
            model,
            total_tokens,
            execution_time_seconds: elapsed.as_secs_f64(),
            estimated_cost_usd,
            timestamp: current_timestamp(),
        }
    }

    pub fn metric(&self, name: &str) -> Option<&MetricConsensus> {
        self.metrics.get(name)
    }

    pub fn quotes(&self) -> &[QuoteConsensus] {
        self.quotes.as_deref().unwrap_or_default()
    }

    pub fn has_flags(&self) -> bool {
        !self.flagged_items.is_empty()
    }

    /// Rating counts over metrics and quotes together.
    pub fn summary(&self) -> StabilitySummary {
        StabilitySummary::from_ratings(
            self.metrics
                .values()
                .map(|m| m.stability)
                .chain(self.quotes().iter().map(|q| q.stability)),
        )
    }
}

/// Review note for a low-stability metric.
pub fn metric_flag(metric: &MetricConsensus) -> String {
    format!(
        "Metric '{}' has LOW stability (CV={})",
        metric.name,
        format_cv_percent(metric.cv)
    )
}

/// Review note for a low-stability quote.
pub fn quote_flag(quote: &QuoteConsensus) -> String {
    format!(
        "Quote '{}...' has LOW stability ({} runs)",
        preview(&quote.text, FLAG_PREVIEW_CHARS),
        quote.fraction()
    )
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::aggregate_metrics;
    use crate::extract::MetricMap;
    use crate::quote::{QuoteRecord, QuoteThresholds, aggregate_quotes};
    use crate::stability::StabilityThresholds;

    fn metrics_from(values: &[f64]) -> BTreeMap<String, MetricConsensus> {
        let per_run: Vec<MetricMap> = values
            .iter()
            .map(|v| MetricMap::from([("beta".to_string(), *v)]))
            .collect();
        aggregate_metrics(&per_run, &StabilityThresholds::default())
    }

    fn runs(n: usize, tokens: u64) -> Vec<RawRun> {
        (0..n).map(|i| RawRun::new(format!("response {i}"), tokens)).collect()
    }

    #[test]
    fn test_tokens_and_cost() {
        let result = ConsensusResult::assemble(
            runs(4, 250_000),
            BTreeMap::new(),
            None,
            Model::ClaudeSonnet4,
            Duration::from_millis(1500),
        );

        assert_eq!(result.n_runs, 4);
        assert_eq!(result.raw_responses.len(), 4);
        assert_eq!(result.total_tokens, 1_000_000);
        assert!((result.estimated_cost_usd - 6.0).abs() < 1e-12);
        assert!((result.execution_time_seconds - 1.5).abs() < 1e-12);
        assert!(result.timestamp > 0);
    }

    #[test]
    fn test_flags_low_metric_with_cv() {
        let result = ConsensusResult::assemble(
            runs(3, 10),
            metrics_from(&[1.0, 2.0, 3.0]),
            None,
            Model::Gpt4o,
            Duration::ZERO,
        );

        assert_eq!(result.overall_stability, StabilityRating::Low);
        assert_eq!(
            result.flagged_items,
            vec!["Metric 'beta' has LOW stability (CV=50.0%)".to_string()]
        );
    }

    #[test]
    fn test_flags_low_quote_with_fraction() {
        let long = "We never get the data on time and nobody tells us why it is late";
        let quotes = aggregate_quotes(
            &[vec![QuoteRecord::new(long, "Informant 4", "")], vec![], vec![], vec![]],
            4,
            &QuoteThresholds::default(),
        );
        let result = ConsensusResult::assemble(
            runs(4, 10),
            metrics_from(&[0.2, 0.2, 0.2, 0.2]),
            Some(quotes),
            Model::ClaudeSonnet4,
            Duration::ZERO,
        );

        assert_eq!(result.overall_stability, StabilityRating::Low);
        assert_eq!(result.flagged_items.len(), 1);
        let flag = &result.flagged_items[0];
        assert!(flag.starts_with("Quote 'We never get the data on time and nobody tells us ..."));
        assert!(flag.ends_with("(1/4 runs)"));
    }

    #[test]
    fn test_no_data_is_unknown() {
        let result = ConsensusResult::assemble(
            Vec::new(),
            BTreeMap::new(),
            Some(Vec::new()),
            Model::ClaudeSonnet4,
            Duration::ZERO,
        );

        assert_eq!(result.n_runs, 0);
        assert_eq!(result.overall_stability, StabilityRating::Unknown);
        assert!(!result.has_flags());
        assert_eq!(result.estimated_cost_usd, 0.0);
        assert!(result.quotes().is_empty());
    }

    #[test]
    fn test_json_roundtrip() {
        let result = ConsensusResult::assemble(
            runs(3, 100),
            metrics_from(&[-5.0, 5.0, 0.0]),
            None,
            Model::from("local-model"),
            Duration::from_secs(2),
        );

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"model\":\"local-model\""));
        assert!(!json.contains("\"quotes\""));

        let back: ConsensusResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.n_runs, 3);
        assert!(back.metrics["beta"].cv.is_infinite());
        assert_eq!(back.flagged_items, result.flagged_items);
        assert_eq!(back.quotes, None);
    }

    #[test]
    fn test_summary_counts_metrics_and_quotes() {
        let quotes = aggregate_quotes(
            &vec![vec![QuoteRecord::new("said every time", "", "")]; 3],
            3,
            &QuoteThresholds::default(),
        );
        let result = ConsensusResult::assemble(
            runs(3, 1),
            metrics_from(&[0.2, 0.2, 0.2]),
            Some(quotes),
            Model::default(),
            Duration::ZERO,
        );

        let summary = result.summary();
        assert_eq!(summary.high, 2);
        assert!(summary.defensible);
    }
}
