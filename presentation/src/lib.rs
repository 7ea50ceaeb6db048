//! Presentation layer for paper-consensus
//!
//! This crate contains the CLI definition, output formatters and
//! progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputArg};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{JsonFormatter, OutputFormatter, formatter_for};
pub use output::markdown::{MarkdownFormatter, stability_emoji, stability_label};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
