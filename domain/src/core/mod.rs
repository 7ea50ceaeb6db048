//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: LLM models and their per-token pricing
//! - [`error::ConfigError`]: configuration errors raised by the domain
//! - [`string`]: character-aware truncation helpers

pub mod error;
pub mod model;
pub mod string;
