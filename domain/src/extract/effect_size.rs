//! Effect sizes and test statistics from pattern-hunting output

use super::{MetricExtractor, MetricMap, MetricRule, apply_rules};
use std::sync::LazyLock;

const NUM: &str = r"([-+]?\d*\.?\d+)";

static RULES: LazyLock<Vec<MetricRule>> = LazyLock::new(|| {
    let ci = |p: &str| format!("(?i){}", p.replace("{NUM}", NUM));
    vec![
        MetricRule::new(
            "beta",
            [
                ci(r"β\s*=\s*{NUM}"),
                ci(r"beta\s*=\s*{NUM}"),
                ci(r"coefficient\s*[=:]\s*{NUM}"),
            ],
        ),
        MetricRule::new(
            "odds_ratio",
            [ci(r"OR\s*=\s*{NUM}"), ci(r"odds\s*ratio\s*[=:]\s*{NUM}")],
        ),
        MetricRule::new(
            "correlation",
            [ci(r"\br\s*=\s*{NUM}"), ci(r"correlation\s*[=:]\s*{NUM}")],
        ),
        MetricRule::new(
            "r_squared",
            [
                ci(r"R²\s*=\s*{NUM}"),
                ci(r"R\^2\s*=\s*{NUM}"),
                ci(r"r-squared\s*[=:]\s*{NUM}"),
                ci(r"r_squared\s*[=:]\s*{NUM}"),
            ],
        ),
        MetricRule::new(
            "p_value",
            [
                ci(r"p\s*<\s*(0?\.\d+)"),
                ci(r"p\s*=\s*(0?\.\d+)"),
                ci(r"p-value\s*[=<]\s*(0?\.\d+)"),
            ],
        ),
        // Case-sensitive on purpose: only n/N, not "an" or "in"
        MetricRule::new(
            "sample_size",
            [
                r"[nN]\s*=\s*(\d+)",
                r"sample\s*size\s*[=:]\s*(\d+)",
                r"observations?\s*[=:]\s*(\d+)",
            ],
        ),
        MetricRule::new(
            "effect_size",
            [
                ci(r"effect\s*size\s*[=:]\s*{NUM}"),
                ci(r"cohen'?s?\s*d\s*[=:]\s*{NUM}"),
            ],
        ),
        MetricRule::new(
            "percentage_change",
            [ci(r"(\d+\.?\d*)\s*%\s*(?:difference|change|increase|decrease)")],
        ),
        MetricRule::new(
            "difference",
            [ci(r"difference\s*(?:of|=|:)\s*{NUM}")],
        ),
    ]
});

/// Extracts beta, odds ratio, correlation, R², p-value, sample size,
/// effect size, percentage change and mean difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectSizeExtractor;

impl EffectSizeExtractor {
    pub const NAME: &'static str = "effect_sizes";
}

impl MetricExtractor for EffectSizeExtractor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(&self, response: &str) -> MetricMap {
        apply_rules(&RULES, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> MetricMap {
        EffectSizeExtractor.extract(text)
    }

    #[test]
    fn test_regression_block() {
        let found = extract(
            "Regression result: β = 0.21 (SE 0.04), R² = 0.34, p < 0.001, N = 412.\n\
             Odds ratio: 2.3",
        );
        assert_eq!(found["beta"], 0.21);
        assert_eq!(found["r_squared"], 0.34);
        assert_eq!(found["p_value"], 0.001);
        assert_eq!(found["sample_size"], 412.0);
        assert_eq!(found["odds_ratio"], 2.3);
    }

    #[test]
    fn test_beta_alternatives_first_match_wins() {
        // The β pattern is tried before "coefficient"
        let found = extract("coefficient: 0.9 ... β=0.2");
        assert_eq!(found["beta"], 0.2);

        let found = extract("The coefficient = -0.15 for tenure");
        assert_eq!(found["beta"], -0.15);
    }

    #[test]
    fn test_correlation_and_effect_size() {
        let found = extract("We found r = 0.45 between them; Cohen's d = 0.8");
        assert_eq!(found["correlation"], 0.45);
        assert_eq!(found["effect_size"], 0.8);
    }

    #[test]
    fn test_percentage_and_difference() {
        let found = extract("There was a 15.3% increase, a difference of 4.2 days");
        assert_eq!(found["percentage_change"], 15.3);
        assert_eq!(found["difference"], 4.2);
    }

    #[test]
    fn test_p_value_equals() {
        let found = extract("p = .023");
        assert_eq!(found["p_value"], 0.023);
    }

    #[test]
    fn test_nothing_found_is_empty() {
        assert!(extract("The interviews suggest a cultural shift.").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_partial_results() {
        let found = extract("beta = 0.20");
        assert_eq!(found.len(), 1);
        assert_eq!(found["beta"], 0.20);
    }
}
