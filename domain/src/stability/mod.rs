//! Stability statistics
//!
//! Turns the values a metric took across consensus runs into summary
//! statistics and a [`StabilityRating`].
//!
//! | Samples | Rating |
//! |---------|--------|
//! | n < 3   | `Unknown` |
//! | CV < `high_cv` | `High` |
//! | CV < `medium_cv` | `Medium` |
//! | otherwise | `Low` |

pub mod metric;
pub mod rating;
pub mod statistics;
pub mod summary;

pub use metric::{MetricConsensus, format_cv_percent};
pub use rating::StabilityRating;
pub use statistics::{
    MetricStatistics, StabilityThresholds, coefficient_of_variation, compute_stability,
    t_multiplier,
};
pub use summary::StabilitySummary;
