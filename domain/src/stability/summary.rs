//! Roll-up of stability ratings across many metrics

use super::metric::MetricConsensus;
use super::rating::StabilityRating;
use serde::{Deserialize, Serialize};

/// Count of each rating plus an overall verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StabilitySummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unknown: usize,
    pub overall: StabilityRating,
    /// Whether the findings can be reported without manual review
    pub defensible: bool,
}

impl StabilitySummary {
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = StabilityRating>,
    {
        let mut summary = Self::default();
        for rating in ratings {
            match rating {
                StabilityRating::High => summary.high += 1,
                StabilityRating::Medium => summary.medium += 1,
                StabilityRating::Low => summary.low += 1,
                StabilityRating::Unknown => summary.unknown += 1,
            }
        }

        summary.overall = StabilityRating::worst(
            [
                (summary.low, StabilityRating::Low),
                (summary.medium, StabilityRating::Medium),
                (summary.high, StabilityRating::High),
            ]
            .into_iter()
            .filter(|(count, _)| *count > 0)
            .map(|(_, rating)| rating),
        );
        summary.defensible = matches!(
            summary.overall,
            StabilityRating::High | StabilityRating::Medium
        );
        summary
    }

    pub fn from_metrics<'a, I>(metrics: I) -> Self
    where
        I: IntoIterator<Item = &'a MetricConsensus>,
    {
        Self::from_ratings(metrics.into_iter().map(|m| m.stability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StabilityRating::*;

    #[test]
    fn test_counts_and_overall() {
        let s = StabilitySummary::from_ratings([High, High, Medium, Unknown]);
        assert_eq!((s.high, s.medium, s.low, s.unknown), (2, 1, 0, 1));
        assert_eq!(s.overall, Medium);
        assert!(s.defensible);
    }

    #[test]
    fn test_any_low_is_not_defensible() {
        let s = StabilitySummary::from_ratings([High, Low]);
        assert_eq!(s.overall, Low);
        assert!(!s.defensible);
    }

    #[test]
    fn test_empty_is_unknown() {
        let s = StabilitySummary::from_ratings([]);
        assert_eq!(s.overall, Unknown);
        assert!(!s.defensible);
    }

    #[test]
    fn test_overall_matches_worst() {
        let cases: [&[StabilityRating]; 5] = [
            &[Unknown, Unknown],
            &[High, Unknown],
            &[Medium, High],
            &[Low, Medium, High, Unknown],
            &[High],
        ];
        for ratings in cases {
            let s = StabilitySummary::from_ratings(ratings.iter().copied());
            assert_eq!(s.overall, StabilityRating::worst(ratings.iter().copied()));
        }
    }
}
