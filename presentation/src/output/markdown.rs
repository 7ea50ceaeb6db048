//! Markdown rendering of consensus results
//!
//! Surfaces confidence and stability next to the findings themselves so a
//! generated report shows which numbers and quotes held up across runs.

use super::formatter::OutputFormatter;
use consensus_domain::core::string::truncate;
use consensus_domain::stability::format_cv_percent;
use consensus_domain::{ConsensusResult, MetricConsensus, QuoteConsensus, StabilityRating};

/// Quote text shown in table rows.
const QUOTE_CELL_CHARS: usize = 50;

/// Colored circle for a rating.
pub fn stability_emoji(rating: StabilityRating) -> &'static str {
    match rating {
        StabilityRating::High => "🟢",
        StabilityRating::Medium => "🟡",
        StabilityRating::Low => "🔴",
        StabilityRating::Unknown => "⚪",
    }
}

/// Emoji plus upper-case label, e.g. `🟢 HIGH`.
pub fn stability_label(rating: StabilityRating) -> String {
    format!("{} {}", stability_emoji(rating), rating.label())
}

/// Sections of the confidence assessment to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownFormatter {
    pub include_metrics: bool,
    pub include_quotes: bool,
    pub include_flags: bool,
    /// Decimal places for metric values
    pub precision: usize,
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self {
            include_metrics: true,
            include_quotes: true,
            include_flags: true,
            precision: 2,
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format(&self, result: &ConsensusResult) -> String {
        self.confidence_section(result)
    }
}

impl MarkdownFormatter {
    /// Full `## Confidence Assessment` section.
    pub fn confidence_section(&self, result: &ConsensusResult) -> String {
        let mut lines: Vec<String> = vec![
            "## Confidence Assessment".into(),
            String::new(),
            format!("*Based on {} consensus runs ({})*", result.n_runs, result.model),
            String::new(),
            format!(
                "**Overall Stability:** {}",
                stability_label(result.overall_stability)
            ),
            String::new(),
        ];

        if self.include_metrics && !result.metrics.is_empty() {
            lines.push("### Metrics".into());
            lines.push(String::new());
            lines.push("| Finding | Value | 95% CI | CV | Stability |".into());
            lines.push("|---------|-------|--------|-----|-----------|".into());
            lines.extend(result.metrics.values().map(|m| metric_row(m, self.precision)));
            lines.push(String::new());
        }

        if self.include_quotes && !result.quotes().is_empty() {
            lines.push("### Quote Stability".into());
            lines.push(String::new());
            lines.push("| Quote (truncated) | Appearances | Rate | Stability |".into());
            lines.push("|-------------------|-------------|------|-----------|".into());
            lines.extend(result.quotes().iter().map(quote_row));
            lines.push(String::new());
        }

        if self.include_flags && result.has_flags() {
            lines.push("### ⚠️ Flags for Review".into());
            lines.push(String::new());
            lines.extend(result.flagged_items.iter().map(|flag| format!("- {}", flag)));
            lines.push(String::new());
        }

        lines.push("### Execution Details".into());
        lines.push(String::new());
        lines.push(format!("- **Runs:** {}", result.n_runs));
        lines.push(format!("- **Time:** {:.1}s", result.execution_time_seconds));
        lines.push(format!(
            "- **Tokens:** {}",
            group_thousands(result.total_tokens)
        ));
        lines.push(format!("- **Est. Cost:** ${:.2}", result.estimated_cost_usd));
        lines.push(String::new());

        lines.join("\n")
    }
}

/// One metrics-table row.
pub fn metric_row(metric: &MetricConsensus, precision: usize) -> String {
    if metric.values.is_empty() {
        return format!(
            "| {} | — | — | — | {} |",
            metric.name,
            stability_label(StabilityRating::Unknown)
        );
    }

    let p = precision;
    format!(
        "| {} | {:.p$} | [{:.p$}, {:.p$}] | {} | {} |",
        metric.name,
        metric.mean,
        metric.ci_lower,
        metric.ci_upper,
        format_cv_percent(metric.cv),
        stability_label(metric.stability)
    )
}

/// One quote-table row; text truncated and pipes escaped.
pub fn quote_row(quote: &QuoteConsensus) -> String {
    let text = truncate(&quote.text, QUOTE_CELL_CHARS).replace('|', "\\|");
    format!(
        "| {} | {} | {:.0}% | {} |",
        text,
        quote.fraction(),
        quote.appearance_rate * 100.0,
        stability_label(quote.stability)
    )
}

/// Metrics as inline prose, e.g.
/// `beta=0.38 (95% CI: [0.34, 0.42], 🟢 HIGH)`; entries joined by `; `.
pub fn metrics_inline(result: &ConsensusResult, precision: usize) -> String {
    let p = precision;
    result
        .metrics
        .values()
        .filter(|m| !m.values.is_empty())
        .map(|m| {
            format!(
                "{}={:.p$} (95% CI: [{:.p$}, {:.p$}], {})",
                m.name,
                m.mean,
                m.ci_lower,
                m.ci_upper,
                stability_label(m.stability)
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// One-line summary, e.g. `🟢 HIGH (3 metrics, 5 quotes)`.
pub fn stability_summary(result: &ConsensusResult) -> String {
    let mut parts = Vec::new();
    if !result.metrics.is_empty() {
        parts.push(format!("{} metrics", result.metrics.len()));
    }
    if !result.quotes().is_empty() {
        parts.push(format!("{} quotes", result.quotes().len()));
    }
    if result.has_flags() {
        parts.push(format!("{} flags", result.flagged_items.len()));
    }

    let detail = if parts.is_empty() {
        "no data".to_string()
    } else {
        parts.join(", ")
    };
    format!("{} ({})", stability_label(result.overall_stability), detail)
}

/// Quotes as block quotes with their rating.
///
/// `show_low` keeps LOW quotes in the list; `warn_low` marks them for
/// manual verification.
pub fn quote_list(quotes: &[QuoteConsensus], show_low: bool, warn_low: bool) -> String {
    if quotes.is_empty() {
        return "*No quotes extracted*".to_string();
    }

    let mut lines = Vec::new();
    for quote in quotes {
        let low = quote.stability.is_low();
        if low && !show_low {
            continue;
        }

        let note = if low && warn_low {
            " ⚠️ *verify manually*"
        } else {
            ""
        };
        lines.push(format!("> \"{}\"", quote.text));
        lines.push(format!(
            "> — {} ({}{})",
            quote.informant,
            stability_label(quote.stability),
            note
        ));
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Warning callout listing every flagged item; empty when nothing is flagged.
pub fn flagged_callout(result: &ConsensusResult) -> String {
    if !result.has_flags() {
        return String::new();
    }

    let mut lines = vec![
        "> **⚠️ Items Flagged for Manual Review**".to_string(),
        ">".to_string(),
    ];
    lines.extend(result.flagged_items.iter().map(|flag| format!("> - {}", flag)));
    lines.push(">".to_string());
    lines.push(
        "> *Low stability items should be verified against raw data before publication.*"
            .to_string(),
    );
    lines.join("\n")
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
