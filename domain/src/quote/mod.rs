//! Qualitative quote consensus
//!
//! Quotes are grouped across runs by their normalized text and rated by how
//! often they reappear.

pub mod consensus;
pub mod record;

pub use consensus::{QuoteConsensus, QuoteThresholds, aggregate_quotes, normalize_quote};
pub use record::QuoteRecord;
