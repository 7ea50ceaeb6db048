//! Consensus run configuration
//!
//! [`ConsensusConfig`] is an immutable value built once from defaults plus
//! overrides and passed explicitly to every component that needs it.
//!
//! ```
//! use consensus_domain::ConsensusConfig;
//! use serde_json::json;
//!
//! let config = ConsensusConfig::default()
//!     .with_overrides(&json!({ "stage_n": { "mine_qual": 30 } }))
//!     .unwrap();
//!
//! assert_eq!(config.stage_n("mine_qual"), 30);
//! assert_eq!(config.stage_n("hunt_patterns"), 25); // sibling kept
//! assert_eq!(config.stage_n("anything_else"), 10); // default_n
//! ```

use crate::core::error::ConfigError;
use crate::quote::QuoteThresholds;
use crate::stability::StabilityThresholds;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Thresholds, run counts and execution limits for consensus analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Runs per stage when the stage has no override
    pub default_n: usize,
    /// Per-stage run count overrides
    pub stage_n: BTreeMap<String, usize>,
    /// CV below this is HIGH
    pub high_stability_cv: f64,
    /// CV below this is MEDIUM
    pub medium_stability_cv: f64,
    /// Appearance rate at or above this is HIGH
    pub quote_high_stability: f64,
    /// Appearance rate at or above this is MEDIUM
    pub quote_medium_stability: f64,
    /// Maximum provider calls in flight at once
    pub max_concurrent_runs: usize,
    /// Per-call timeout
    pub timeout_per_run_seconds: u64,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        let stage_n = BTreeMap::from([
            ("hunt_patterns".to_string(), 25),
            ("mine_qual".to_string(), 15),
            ("verify_claims".to_string(), 10),
        ]);

        Self {
            default_n: 10,
            stage_n,
            high_stability_cv: 0.10,
            medium_stability_cv: 0.25,
            quote_high_stability: 0.75,
            quote_medium_stability: 0.50,
            max_concurrent_runs: 10,
            timeout_per_run_seconds: 120,
        }
    }
}

impl ConsensusConfig {
    /// Deep-merge `overrides` onto this configuration.
    ///
    /// Nested mappings merge key by key, anything else replaces. Unknown
    /// keys are ignored; a recognized key with the wrong type is an error.
    pub fn with_overrides(&self, overrides: &Value) -> Result<Self, ConfigError> {
        if !overrides.is_object() {
            return Err(ConfigError::NotAMapping(json_kind(overrides).to_string()));
        }

        let mut merged = serde_json::to_value(self)?;
        merge_values(&mut merged, overrides);
        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Build from defaults plus an override mapping.
    pub fn from_overrides(overrides: &Value) -> Result<Self, ConfigError> {
        Self::default().with_overrides(overrides)
    }

    /// Check invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_runs == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_runs must be at least 1".to_string(),
            ));
        }
        if self.timeout_per_run_seconds == 0 {
            return Err(ConfigError::Invalid(
                "timeout_per_run_seconds cannot be 0".to_string(),
            ));
        }
        if self.high_stability_cv >= self.medium_stability_cv {
            return Err(ConfigError::Invalid(format!(
                "high_stability_cv ({}) must be below medium_stability_cv ({})",
                self.high_stability_cv, self.medium_stability_cv
            )));
        }
        if self.quote_high_stability <= self.quote_medium_stability {
            return Err(ConfigError::Invalid(format!(
                "quote_high_stability ({}) must be above quote_medium_stability ({})",
                self.quote_high_stability, self.quote_medium_stability
            )));
        }
        Ok(())
    }

    /// Run count for a named stage, falling back to `default_n`.
    pub fn stage_n(&self, stage: &str) -> usize {
        self.stage_n.get(stage).copied().unwrap_or(self.default_n)
    }

    pub fn metric_thresholds(&self) -> StabilityThresholds {
        StabilityThresholds::new(self.high_stability_cv, self.medium_stability_cv)
    }

    pub fn quote_thresholds(&self) -> QuoteThresholds {
        QuoteThresholds::new(self.quote_high_stability, self.quote_medium_stability)
    }

    pub fn timeout_per_run(&self) -> Duration {
        Duration::from_secs(self.timeout_per_run_seconds)
    }

    // ==================== Builder Methods ====================

    pub fn with_max_concurrent_runs(mut self, max: usize) -> Self {
        self.max_concurrent_runs = max;
        self
    }

    pub fn with_timeout_per_run_seconds(mut self, seconds: u64) -> Self {
        self.timeout_per_run_seconds = seconds;
        self
    }
}

/// Recursively merge `overrides` into `base`.
///
/// Objects present on both sides are merged key by key; any other value in
/// `overrides` replaces the one in `base`.
pub fn merge_values(base: &mut Value, overrides: &Value) {
    match (base, overrides) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            for (key, value) in override_map {
                match base_map.get_mut(key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_values(existing, value);
                    }
                    _ => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overrides) => *base = overrides.clone(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ConsensusConfig::default();
        assert_eq!(config.default_n, 10);
        assert_eq!(config.stage_n("hunt_patterns"), 25);
        assert_eq!(config.stage_n("mine_qual"), 15);
        assert_eq!(config.stage_n("verify_claims"), 10);
        assert_eq!(config.max_concurrent_runs, 10);
        assert_eq!(config.timeout_per_run(), Duration::from_secs(120));
        assert_eq!(config.metric_thresholds(), StabilityThresholds::default());
        assert_eq!(config.quote_thresholds(), QuoteThresholds::default());
    }

    #[test]
    fn test_partial_stage_override_keeps_siblings() {
        let config = ConsensusConfig::from_overrides(&json!({
            "stage_n": { "hunt_patterns": 40 }
        }))
        .unwrap();

        assert_eq!(config.stage_n("hunt_patterns"), 40);
        assert_eq!(config.stage_n("mine_qual"), 15);
        assert_eq!(config.stage_n("verify_claims"), 10);
    }

    #[test]
    fn test_new_stage_and_scalars() {
        let config = ConsensusConfig::from_overrides(&json!({
            "default_n": 5,
            "high_stability_cv": 0.05,
            "stage_n": { "write_discussion": 3 }
        }))
        .unwrap();

        assert_eq!(config.stage_n("write_discussion"), 3);
        assert_eq!(config.stage_n("unlisted"), 5);
        assert_eq!(config.metric_thresholds().high_cv, 0.05);
        assert_eq!(config.metric_thresholds().medium_cv, 0.25);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = ConsensusConfig::from_overrides(&json!({
            "use_batch_api": true,
            "default_provider": "openai"
        }))
        .unwrap();
        assert_eq!(config, ConsensusConfig::default());
    }

    #[test]
    fn test_wrong_type_is_error() {
        let result = ConsensusConfig::from_overrides(&json!({ "default_n": "ten" }));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_non_mapping_is_error() {
        let result = ConsensusConfig::from_overrides(&json!([1, 2, 3]));
        assert!(matches!(result, Err(ConfigError::NotAMapping(kind)) if kind == "array"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let result = ConsensusConfig::from_overrides(&json!({ "max_concurrent_runs": 0 }));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let result = ConsensusConfig::from_overrides(&json!({ "high_stability_cv": 0.5 }));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_equal_thresholds_rejected() {
        let result = ConsensusConfig::from_overrides(
            &json!({ "high_stability_cv": 0.2, "medium_stability_cv": 0.2 }),
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = ConsensusConfig::from_overrides(
            &json!({ "quote_high_stability": 0.6, "quote_medium_stability": 0.6 }),
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let ok = ConsensusConfig::from_overrides(
            &json!({ "high_stability_cv": 0.19, "medium_stability_cv": 0.2 }),
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_merge_values_deep() {
        let mut base = json!({ "a": { "x": 1, "y": 2 }, "b": 1 });
        merge_values(&mut base, &json!({ "a": { "y": 3 }, "c": [1] }));
        assert_eq!(base, json!({ "a": { "x": 1, "y": 3 }, "b": 1, "c": [1] }));
    }

    #[test]
    fn test_merge_replaces_non_objects() {
        let mut base = json!({ "a": { "x": 1 } });
        merge_values(&mut base, &json!({ "a": 5 }));
        assert_eq!(base, json!({ "a": 5 }));
    }
}
