//! Attributed quotes from qualitative mining output
//!
//! Three conventions are recognized, in this order:
//!
//! ```text
//! > "Quote text"                       block quote, attribution on the
//! > — Informant 12, Manager            next quoted line
//!
//! "Quote text" (Informant 5, Worker)   inline parenthetical
//!
//! "Quote text" — Informant 12          dash attribution
//! ```
//!
//! The inline and dash forms need at least 20 characters of quote text. A
//! quote already captured by an earlier convention is not added again.

use super::{QuoteExtractor, compile};
use crate::quote::QuoteRecord;
use regex::Regex;
use std::sync::LazyLock;

static BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#">\s*"([^"]+)"\s*\n>\s*[-—]\s*([^,\n]+)(?:,\s*([^\n]+))?"#)
});

static INLINE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#""([^"]{20,})"[^("\n]*\(([^)]+)\)"#));

static DASH: LazyLock<Regex> =
    LazyLock::new(|| compile(r#""([^"]{20,})"\s*[-—]+\s*([^\n]+)"#));

/// Extracts quotes in the block-quote, inline and dash conventions.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteMarkupExtractor;

impl QuoteMarkupExtractor {
    pub const NAME: &'static str = "quotes";
}

fn push_unique(quotes: &mut Vec<QuoteRecord>, record: QuoteRecord) {
    if !quotes.iter().any(|q| q.text == record.text) {
        quotes.push(record);
    }
}

impl QuoteExtractor for QuoteMarkupExtractor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(&self, response: &str) -> Vec<QuoteRecord> {
        let mut quotes = Vec::new();

        for caps in BLOCKQUOTE.captures_iter(response) {
            let text = caps.get(1).map_or("", |m| m.as_str()).trim();
            let informant = caps.get(2).map_or("", |m| m.as_str()).trim();
            let context = caps.get(3).map_or("", |m| m.as_str()).trim();
            push_unique(&mut quotes, QuoteRecord::new(text, informant, context));
        }

        for caps in INLINE.captures_iter(response) {
            let text = caps.get(1).map_or("", |m| m.as_str()).trim();
            let attribution = caps.get(2).map_or("", |m| m.as_str());
            let (informant, context) = match attribution.split_once(',') {
                Some((who, rest)) => (who.trim(), rest.trim()),
                None => (attribution.trim(), ""),
            };
            push_unique(&mut quotes, QuoteRecord::new(text, informant, context));
        }

        for caps in DASH.captures_iter(response) {
            let text = caps.get(1).map_or("", |m| m.as_str()).trim();
            let informant = caps.get(2).map_or("", |m| m.as_str()).trim();
            push_unique(&mut quotes, QuoteRecord::new(text, informant, ""));
        }

        quotes
    }
}
