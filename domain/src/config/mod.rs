//! Configuration value objects for the domain layer
//!
//! These are domain concepts related to configuration that are
//! used across multiple layers.

mod consensus_config;
mod output_format;

pub use consensus_config::{ConsensusConfig, merge_values};
pub use output_format::OutputFormat;
