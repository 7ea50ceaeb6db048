//! Sample statistics and CV-based stability classification
//!
//! [`compute_stability`] is a pure transform from a sample list to
//! [`MetricStatistics`]. It never fails: degenerate inputs are represented
//! in the data (zero statistics, `Unknown` rating, infinite CV).

use super::rating::StabilityRating;
use serde::{Deserialize, Serialize};

/// Minimum sample count before a metric can be rated at all.
pub const MIN_RATED_SAMPLES: usize = 3;

/// Sample size from which the normal approximation is used for the CI.
pub const LARGE_SAMPLE: usize = 30;

/// z multiplier for a 95% interval on large samples.
const Z_95: f64 = 1.96;

/// Multiplier used when `n` has no entry in the small-sample table.
const DEFAULT_T: f64 = 2.0;

/// CV thresholds for numeric metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityThresholds {
    /// CV strictly below this is `High`
    pub high_cv: f64,
    /// CV strictly below this (and not high) is `Medium`
    pub medium_cv: f64,
}

impl Default for StabilityThresholds {
    fn default() -> Self {
        Self {
            high_cv: 0.10,
            medium_cv: 0.25,
        }
    }
}

impl StabilityThresholds {
    pub fn new(high_cv: f64, medium_cv: f64) -> Self {
        Self { high_cv, medium_cv }
    }

    /// Rate a CV observed over `n` samples.
    pub fn classify(&self, n: usize, cv: f64) -> StabilityRating {
        if n < MIN_RATED_SAMPLES {
            StabilityRating::Unknown
        } else if cv < self.high_cv {
            StabilityRating::High
        } else if cv < self.medium_cv {
            StabilityRating::Medium
        } else {
            StabilityRating::Low
        }
    }
}

/// Summary statistics for one metric's samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricStatistics {
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample (n - 1) standard deviation
    pub std: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    /// Coefficient of variation, `|std / mean|`
    pub cv: f64,
    pub stability: StabilityRating,
}

/// Two-sided 95% t multiplier for a sample of size `n` (n < 30).
///
/// Only the tabulated sizes are exact; everything else uses 2.0.
pub fn t_multiplier(n: usize) -> f64 {
    match n {
        2 => 12.71,
        3 => 4.30,
        4 => 3.18,
        5 => 2.78,
        6 => 2.57,
        7 => 2.45,
        8 => 2.36,
        9 => 2.31,
        10 => 2.26,
        15 => 2.14,
        20 => 2.09,
        25 => 2.06,
        _ => DEFAULT_T,
    }
}

/// Coefficient of variation with the zero-mean cases made explicit.
pub fn coefficient_of_variation(mean: f64, std: f64) -> f64 {
    if mean != 0.0 {
        (std / mean).abs()
    } else if std > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Compute mean/median/std/95% CI/CV and a stability rating for `samples`.
pub fn compute_stability(samples: &[f64], thresholds: &StabilityThresholds) -> MetricStatistics {
    let n = samples.len();
    if n == 0 {
        return MetricStatistics::default();
    }

    // Shifted by the first sample so identical values give that value back
    // exactly, with zero spread.
    let x0 = samples[0];
    let shift = samples.iter().map(|x| x - x0).sum::<f64>() / n as f64;
    let mean = x0 + shift;
    let median = median(samples);

    if n == 1 {
        return MetricStatistics {
            n,
            mean,
            median,
            std: 0.0,
            ci_lower: mean,
            ci_upper: mean,
            cv: 0.0,
            stability: StabilityRating::Unknown,
        };
    }

    let variance = samples
        .iter()
        .map(|x| (x - x0 - shift).powi(2))
        .sum::<f64>()
        / (n - 1) as f64;
    let std = variance.sqrt();

    let multiplier = if n >= LARGE_SAMPLE {
        Z_95
    } else {
        t_multiplier(n)
    };
    let margin = multiplier * std / (n as f64).sqrt();
    let cv = coefficient_of_variation(mean, std);

    MetricStatistics {
        n,
        mean,
        median,
        std,
        ci_lower: mean - margin,
        ci_upper: mean + margin,
        cv,
        stability: thresholds.classify(n, cv),
    }
}

fn median(samples: &[f64]) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
