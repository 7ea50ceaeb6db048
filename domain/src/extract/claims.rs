//! Structured claim blocks from verification output
//!
//! ```text
//! ### Claim 1: Effect of tenure on turnover
//! Statement: "Tenure reduces turnover"
//! Value: β = -0.21, p < 0.01
//! ```

use super::effect_size::EffectSizeExtractor;
use super::{MetricExtractor, MetricMap, compile};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CLAIM_HEADER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?:###\s*)?Claim\s+(\d+)[:\s]"));

static STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)Statement[:\s]*"?([^"\n]+)"?"#));

static VALUE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(?:Expected\s*value|Value)[:\s]*([^\n]+)"));

/// One claim block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub id: String,
    pub statement: String,
    /// Raw text after `Value:` / `Expected value:`
    pub value_string: String,
    /// Effect sizes parsed out of `value_string`
    pub metrics: MetricMap,
}

/// Split a response on `Claim N:` headers and parse each block.
pub fn extract_claims(response: &str) -> Vec<ClaimRecord> {
    let headers: Vec<(String, usize, usize)> = CLAIM_HEADER
        .captures_iter(response)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let id = caps.get(1)?.as_str().to_string();
            Some((id, whole.start(), whole.end()))
        })
        .collect();

    headers
        .iter()
        .enumerate()
        .map(|(i, (id, _, content_start))| {
            let content_end = headers
                .get(i + 1)
                .map_or(response.len(), |(_, next_start, _)| *next_start);
            parse_block(id, &response[*content_start..content_end])
        })
        .collect()
}

fn parse_block(id: &str, content: &str) -> ClaimRecord {
    let capture = |re: &Regex| {
        re.captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    };

    let statement = capture(&STATEMENT);
    let value_string = capture(&VALUE);
    let metrics = EffectSizeExtractor.extract(&value_string);

    ClaimRecord {
        id: id.to_string(),
        statement,
        value_string,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
### Claim 1: Effect of tenure on turnover
Statement: \"Tenure reduces turnover\"
Value: β = -0.21, p < 0.01

### Claim 2: Remote work
Statement: Remote teams ship faster
Expected value: 15% increase
";

    #[test]
    fn test_extract_two_claims() {
        let claims = extract_claims(REPORT);
        assert_eq!(claims.len(), 2);

        assert_eq!(claims[0].id, "1");
        assert_eq!(claims[0].statement, "Tenure reduces turnover");
        assert_eq!(claims[0].value_string, "β = -0.21, p < 0.01");
        assert_eq!(claims[0].metrics["beta"], -0.21);
        assert_eq!(claims[0].metrics["p_value"], 0.01);

        assert_eq!(claims[1].id, "2");
        assert_eq!(claims[1].statement, "Remote teams ship faster");
        assert_eq!(claims[1].value_string, "15% increase");
        assert_eq!(claims[1].metrics["percentage_change"], 15.0);
    }

    #[test]
    fn test_claim_without_value() {
        let claims = extract_claims("Claim 7: Statement: Managers disagree");
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].statement, "Managers disagree");
        assert_eq!(claims[0].value_string, "");
        assert!(claims[0].metrics.is_empty());
    }

    #[test]
    fn test_no_claims() {
        assert!(extract_claims("Nothing to verify here.").is_empty());
    }
}
