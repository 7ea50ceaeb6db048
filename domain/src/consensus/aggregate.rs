//! Pure aggregation over successful runs

use crate::extract::MetricMap;
use crate::quote::QuoteConsensus;
use crate::stability::{MetricConsensus, StabilityRating, StabilityThresholds};
use std::collections::BTreeMap;

/// Build one [`MetricConsensus`] per metric name seen in any run.
///
/// A run that did not report a metric contributes nothing to that metric's
/// sample; it is not counted as zero.
pub fn aggregate_metrics(
    per_run: &[MetricMap],
    thresholds: &StabilityThresholds,
) -> BTreeMap<String, MetricConsensus> {
    let mut samples: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for metrics in per_run {
        for (name, value) in metrics {
            samples.entry(name.as_str()).or_default().push(*value);
        }
    }

    samples
        .into_iter()
        .map(|(name, values)| {
            (
                name.to_string(),
                MetricConsensus::from_samples(name, values, thresholds),
            )
        })
        .collect()
}

/// Worst rating among all metrics and quotes; `Unknown` only when the
/// result holds no rated item at all.
pub fn overall_stability<'a, M, Q>(metrics: M, quotes: Q) -> StabilityRating
where
    M: IntoIterator<Item = &'a MetricConsensus>,
    Q: IntoIterator<Item = &'a QuoteConsensus>,
{
    let ratings = metrics
        .into_iter()
        .map(|m| m.stability)
        .chain(quotes.into_iter().map(|q| q.stability));
    StabilityRating::worst(ratings)
}
