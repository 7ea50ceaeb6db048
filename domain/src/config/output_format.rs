//! Output format value object

use serde::{Deserialize, Serialize};

/// How a consensus result is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Full markdown confidence section (default)
    #[default]
    Markdown,
    /// One-line stability summary plus flags
    Summary,
    /// JSON output
    Json,
}
