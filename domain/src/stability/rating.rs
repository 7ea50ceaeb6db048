//! Stability rating enumeration

use serde::{Deserialize, Serialize};

/// Coarse classification of how much a metric or quote varies across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StabilityRating {
    /// CV under the high threshold (or quote seen in most runs)
    High,
    /// Mostly defensible, variance worth noting
    Medium,
    /// Ambiguous, flag for manual review
    Low,
    /// Insufficient data
    #[default]
    Unknown,
}

impl StabilityRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            StabilityRating::High => "high",
            StabilityRating::Medium => "medium",
            StabilityRating::Low => "low",
            StabilityRating::Unknown => "unknown",
        }
    }

    /// Upper-case label, e.g. `HIGH`
    pub fn label(&self) -> &'static str {
        match self {
            StabilityRating::High => "HIGH",
            StabilityRating::Medium => "MEDIUM",
            StabilityRating::Low => "LOW",
            StabilityRating::Unknown => "UNKNOWN",
        }
    }

    /// Text badge for reports
    pub fn badge(&self) -> &'static str {
        match self {
            StabilityRating::High => "HIGH ✓",
            StabilityRating::Medium => "MEDIUM ~",
            StabilityRating::Low => "LOW ⚠️",
            StabilityRating::Unknown => "UNKNOWN ?",
        }
    }

    pub fn is_low(&self) -> bool {
        matches!(self, StabilityRating::Low)
    }

    /// Ordering used for "at least as stable as" comparisons.
    ///
    /// `Unknown` ranks below `Low` since it carries no evidence at all.
    pub fn rank(&self) -> u8 {
        match self {
            StabilityRating::High => 3,
            StabilityRating::Medium => 2,
            StabilityRating::Low => 1,
            StabilityRating::Unknown => 0,
        }
    }

    /// Worst rating present among `ratings`.
    ///
    /// `Low` if any is low, else `Medium` if any is medium, else `High` if
    /// any is high, else `Unknown` (no ratings, or only unknown ones).
    pub fn worst<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = StabilityRating>,
    {
        let (mut low, mut medium, mut high) = (false, false, false);
        for rating in ratings {
            match rating {
                StabilityRating::Low => low = true,
                StabilityRating::Medium => medium = true,
                StabilityRating::High => high = true,
                StabilityRating::Unknown => {}
            }
        }

        if low {
            StabilityRating::Low
        } else if medium {
            StabilityRating::Medium
        } else if high {
            StabilityRating::High
        } else {
            StabilityRating::Unknown
        }
    }
}

impl std::fmt::Display for StabilityRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for StabilityRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(StabilityRating::High),
            "medium" => Ok(StabilityRating::Medium),
            "low" => Ok(StabilityRating::Low),
            "unknown" => Ok(StabilityRating::Unknown),
            other => Err(format!(
                "Unknown stability rating: {}. Valid: high, medium, low, unknown",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StabilityRating::*;

    #[test]
    fn test_worst_prefers_low() {
        assert_eq!(StabilityRating::worst([High, Low, Medium]), Low);
        assert_eq!(StabilityRating::worst([High, Medium, Unknown]), Medium);
        assert_eq!(StabilityRating::worst([High, Unknown]), High);
    }

    #[test]
    fn test_worst_of_nothing_is_unknown() {
        assert_eq!(StabilityRating::worst([]), Unknown);
        assert_eq!(StabilityRating::worst([Unknown, Unknown]), Unknown);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&High).unwrap(), "\"high\"");
        let parsed: StabilityRating = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(parsed, Unknown);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("MEDIUM".parse::<StabilityRating>().ok(), Some(Medium));
        assert!("shaky".parse::<StabilityRating>().is_err());
        assert_eq!(Low.to_string(), "LOW");
        assert_eq!(High.badge(), "HIGH ✓");
    }
}
