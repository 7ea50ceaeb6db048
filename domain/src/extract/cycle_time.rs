//! Cycle-time metrics from workflow analysis output

use super::{MetricExtractor, MetricMap, MetricRule, apply_rules};
use std::sync::LazyLock;

static RULES: LazyLock<Vec<MetricRule>> = LazyLock::new(|| {
    vec![
        MetricRule::new(
            "total_days",
            [
                r"(?i)(?:total\s*)?cycle\s*time[:\s]*(\d+\.?\d*)\s*days?",
                r"(?i)(\d+\.?\d*)\s*days?\s*(?:total|elapsed)",
            ],
        ),
        MetricRule::new("active_pct", [r"(?i)active[:\s]*(\d+\.?\d*)\s*%"]),
        MetricRule::new("wait_pct", [r"(?i)wait(?:ing)?[:\s]*(\d+\.?\d*)\s*%"]),
        MetricRule::new("handoffs", [r"(?i)handoffs?[:\s]*(\d+)"]),
    ]
});

/// Extracts total cycle time (days), active/wait percentages and handoffs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleTimeExtractor;

impl CycleTimeExtractor {
    pub const NAME: &'static str = "cycle_time";
}

impl MetricExtractor for CycleTimeExtractor {
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

    #[test]
    fn test_full_summary() {
        let found = CycleTimeExtractor.extract(
            "Total cycle time: 14.5 days\nActive: 22%\nWaiting: 78%\nHandoffs: 6",
        );
        assert_eq!(found["total_days"], 14.5);
        assert_eq!(found["active_pct"], 22.0);
        assert_eq!(found["wait_pct"], 78.0);
        assert_eq!(found["handoffs"], 6.0);
    }

    #[test]
    fn test_elapsed_days_alternative() {
        let found = CycleTimeExtractor.extract("Orders took 9 days elapsed from intake.");
        assert_eq!(found["total_days"], 9.0);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_no_match() {
        assert!(CycleTimeExtractor.extract("No workflow data.").is_empty());
    }
}
