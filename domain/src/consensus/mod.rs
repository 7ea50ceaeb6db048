//! Consensus aggregation
//!
//! Combines the per-run extraction output of one consensus request into a
//! single [`ConsensusResult`].

pub mod aggregate;
pub mod result;

pub use aggregate::{aggregate_metrics, overall_stability};
pub use result::{ConsensusResult, RawRun, metric_flag, quote_flag};
