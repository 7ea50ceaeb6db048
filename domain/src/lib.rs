//! Domain layer for paper-consensus
//!
//! This crate contains the core logic of consensus analysis: statistics,
//! stability ratings, quote aggregation and response extraction. It has no
//! dependencies on infrastructure or presentation concerns, and nothing in
//! it performs I/O.
//!
//! # Core Concepts
//!
//! ## Consensus
//!
//! The same prompt is sent to an LLM N times. Each response is run through
//! extractors, and the spread of what was extracted tells how much a finding
//! can be trusted:
//!
//! - **Metrics**: numeric values rated by coefficient of variation
//! - **Quotes**: attributed quotes rated by how often they reappear
//!
//! ## Stability
//!
//! - **HIGH**: defensible as reported
//! - **MEDIUM**: defensible, variance worth noting
//! - **LOW**: flagged for manual review
//! - **UNKNOWN**: not enough data

pub mod config;
pub mod consensus;
pub mod core;
pub mod extract;
pub mod providers;
pub mod quote;
pub mod stability;

// Re-export commonly used types
pub use config::{ConsensusConfig, OutputFormat};
pub use consensus::{ConsensusResult, RawRun, aggregate_metrics, overall_stability};
pub use core::{error::ConfigError, model::Model};
pub use extract::{
    ClaimRecord, CycleTimeExtractor, EffectSizeExtractor, MetricExtractor, MetricMap,
    QuoteExtractor, QuoteMarkupExtractor, Stage, StageExtractors, extract_claims,
};
pub use providers::{AnthropicProviderConfig, OpenAiProviderConfig, ProviderConfig};
pub use quote::{QuoteConsensus, QuoteRecord, QuoteThresholds, aggregate_quotes};
pub use stability::{
    MetricConsensus, MetricStatistics, StabilityRating, StabilitySummary, StabilityThresholds,
    compute_stability,
};
