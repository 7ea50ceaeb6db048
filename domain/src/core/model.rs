//! Model value object representing an LLM model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Price per million tokens for models missing from the table.
pub const FALLBACK_PRICE_PER_MILLION: f64 = 3.0;

/// LLM models with known pricing (Value Object)
///
/// Any other identifier is carried through as [`Model::Custom`] and priced
/// at [`FALLBACK_PRICE_PER_MILLION`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // Claude models
    ClaudeSonnet4,
    ClaudeHaiku35,
    // GPT models
    Gpt4oMini,
    Gpt4o,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::ClaudeSonnet4 => "claude-sonnet-4-20250514",
            Model::ClaudeHaiku35 => "claude-3-5-haiku-20241022",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Gpt4o => "gpt-4o",
            Model::Custom(s) => s,
        }
    }

    /// Approximate blended (input + output) price in USD per million tokens.
    pub fn price_per_million(&self) -> f64 {
        match self {
            Model::ClaudeSonnet4 => 6.0,
            Model::ClaudeHaiku35 => 1.0,
            Model::Gpt4oMini => 0.3,
            Model::Gpt4o => 5.0,
            Model::Custom(_) => FALLBACK_PRICE_PER_MILLION,
        }
    }

    /// Rough cost estimate for a token count.
    pub fn estimate_cost(&self, tokens: u64) -> f64 {
        (tokens as f64 / 1_000_000.0) * self.price_per_million()
    }

    /// Check if this is a Claude model
    pub fn is_claude(&self) -> bool {
        matches!(self, Model::ClaudeSonnet4 | Model::ClaudeHaiku35)
    }

    /// Check if this is a GPT model
    pub fn is_gpt(&self) -> bool {
        matches!(self, Model::Gpt4oMini | Model::Gpt4o)
    }
}

impl Default for Model {
    /// Returns the default model (Claude Sonnet 4)
    fn default() -> Self {
        Model::ClaudeSonnet4
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s {
            "claude-sonnet-4-20250514" => Model::ClaudeSonnet4,
            "claude-3-5-haiku-20241022" => Model::ClaudeHaiku35,
            "gpt-4o-mini" => Model::Gpt4oMini,
            "gpt-4o" => Model::Gpt4o,
            other => Model::Custom(other.to_string()),
        }
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::from(s))
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}
