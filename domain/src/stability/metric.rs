//! Per-metric consensus record

use super::rating::StabilityRating;
use super::statistics::{StabilityThresholds, compute_stability};
use serde::{Deserialize, Serialize};

/// Statistical consensus for a single named metric.
///
/// Built once per distinct metric name from the values of the runs that
/// reported it; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricConsensus {
    pub name: String,
    pub values: Vec<f64>,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    /// Coefficient of variation; may be infinite
    #[serde(with = "non_finite")]
    pub cv: f64,
    pub stability: StabilityRating,
}

impl MetricConsensus {
    /// Compute statistics for `values` and wrap them under `name`.
    pub fn from_samples(
        name: impl Into<String>,
        values: Vec<f64>,
        thresholds: &StabilityThresholds,
    ) -> Self {
        let stats = compute_stability(&values, thresholds);
        Self {
            name: name.into(),
            values,
            mean: stats.mean,
            median: stats.median,
            std: stats.std,
            ci_lower: stats.ci_lower,
            ci_upper: stats.ci_upper,
            cv: stats.cv,
            stability: stats.stability,
        }
    }

    /// Number of samples behind this metric
    pub fn n(&self) -> usize {
        self.values.len()
    }

    /// Format for inclusion in a paper.
    ///
    /// e.g. `0.21 (±0.03 SD, 95% CI: [0.18, 0.24], CV=8.0%, n=25)`
    pub fn format_for_paper(&self, precision: usize) -> String {
        if self.values.is_empty() {
            return "[No data]".to_string();
        }

        let p = precision;
        if self.n() == 1 {
            return format!("{:.p$} (single run)", self.mean);
        }

        format!(
            "{:.p$} (±{:.p$} SD, 95% CI: [{:.p$}, {:.p$}], CV={}, n={})",
            self.mean,
            self.std,
            self.ci_lower,
            self.ci_upper,
            format_cv_percent(self.cv),
            self.n()
        )
    }
}

/// Render a CV as a percentage with one decimal, e.g. `8.0%`.
pub fn format_cv_percent(cv: f64) -> String {
    if cv.is_finite() {
        format!("{:.1}%", cv * 100.0)
    } else {
        "∞".to_string()
    }
}

/// Serde helpers that keep non-finite floats representable in JSON.
///
/// Finite values are written as numbers; infinities and NaN as the strings
/// `"Infinity"`, `"-Infinity"` and `"NaN"`.
pub mod non_finite {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if *value > 0.0 {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(s) => match s.as_str() {
                "Infinity" | "inf" => Ok(f64::INFINITY),
                "-Infinity" | "-inf" => Ok(f64::NEG_INFINITY),
                "NaN" | "nan" => Ok(f64::NAN),
                other => Err(D::Error::custom(format!("invalid float: {}", other))),
            },
        }
    }
}
