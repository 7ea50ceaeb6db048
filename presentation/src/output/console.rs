//! Console output formatter for consensus results

use super::formatter::OutputFormatter;
use super::markdown::{metrics_inline, stability_summary};
use colored::{ColoredString, Colorize};
use consensus_domain::{ConsensusResult, StabilityRating};

/// Colored terminal summary: verdict, metrics and flags.
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    fn paint(rating: StabilityRating, text: &str) -> ColoredString {
        match rating {
            StabilityRating::High => text.green(),
            StabilityRating::Medium => text.yellow(),
            StabilityRating::Low => text.red().bold(),
            StabilityRating::Unknown => text.dimmed(),
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &ConsensusResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Consensus Summary"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Stability:".cyan().bold(),
            Self::paint(result.overall_stability, &stability_summary(result))
        ));
        output.push_str(&format!(
            "{} {} runs ({}), {:.1}s, ${:.2}\n",
            "Runs:".cyan().bold(),
            result.n_runs,
            result.model,
            result.execution_time_seconds,
            result.estimated_cost_usd
        ));

        let inline = metrics_inline(result, 2);
        if !inline.is_empty() {
            output.push_str(&Self::section_header("Metrics"));
            for entry in inline.split("; ") {
                output.push_str(&format!("  * {}\n", entry));
            }
        }

        if result.has_flags() {
            output.push_str(&Self::section_header("Flagged for Review"));
            for flag in &result.flagged_items {
                output.push_str(&format!("  {} {}\n", "!".red().bold(), flag));
            }
        }

        output.push_str(&Self::footer());
        output
    }
}
