//! Output formatter trait

use consensus_domain::{ConsensusResult, OutputFormat};

use super::console::ConsoleFormatter;
use super::markdown::MarkdownFormatter;

/// Trait for rendering consensus results
pub trait OutputFormatter {
    /// Render the complete result
    fn format(&self, result: &ConsensusResult) -> String;
}

/// JSON output, pretty-printed
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &ConsensusResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Pick the formatter for an output format.
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Markdown => Box::new(MarkdownFormatter::default()),
        OutputFormat::Summary => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
