//! Configuration file loading for paper-consensus
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PAPER_CONSENSUS_*` environment variables (`__` separates nested keys)
//! 2. `--config <path>` specified file
//! 3. Project root: `./consensus.toml` or `./.consensus.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/paper-consensus/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{FileConfig, FileOutputConfig};
pub use loader::{ConfigLoadError, ConfigLoader};
