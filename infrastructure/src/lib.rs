//! Infrastructure layer for paper-consensus
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: LLM provider clients, configuration file
//! loading and result recording.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigLoadError, ConfigLoader, FileConfig, FileOutputConfig};
pub use logging::JsonlResultRecorder;
pub use providers::{ProviderFactory, ProviderKind, ProviderSetupError};
