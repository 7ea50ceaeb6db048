//! Pipeline stages and the extractors each one uses

use super::{EffectSizeExtractor, MetricExtractor, QuoteExtractor, QuoteMarkupExtractor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A paper-mining pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Effect sizes across the dataset
    HuntPatterns,
    /// Qualitative quote mining
    MineQual,
    /// Final verification of quantitative claims
    VerifyClaims,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::HuntPatterns, Stage::MineQual, Stage::VerifyClaims];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::HuntPatterns => "hunt_patterns",
            Stage::MineQual => "mine_qual",
            Stage::VerifyClaims => "verify_claims",
        }
    }

    /// Extractors for this stage
    pub fn extractors(&self) -> StageExtractors {
        match self {
            Stage::HuntPatterns | Stage::VerifyClaims => {
                StageExtractors::metrics_only(Arc::new(EffectSizeExtractor))
            }
            Stage::MineQual => StageExtractors::quotes_only(Arc::new(QuoteMarkupExtractor)),
        }
    }

    /// Extractors for a stage given by name; unknown names get none.
    pub fn extractors_for(name: &str) -> StageExtractors {
        name.parse::<Stage>()
            .map(|stage| stage.extractors())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "hunt_patterns" => Ok(Stage::HuntPatterns),
            "mine_qual" => Ok(Stage::MineQual),
            "verify_claims" => Ok(Stage::VerifyClaims),
            other => Err(format!(
                "Unknown stage: {}. Valid: hunt_patterns, mine_qual, verify_claims",
                other
            )),
        }
    }
}

/// Metric and/or quote extractor pair handed to the consensus engine.
#[derive(Clone, Default)]
pub struct StageExtractors {
    pub metrics: Option<Arc<dyn MetricExtractor>>,
    pub quotes: Option<Arc<dyn QuoteExtractor>>,
}

impl StageExtractors {
    pub fn metrics_only(extractor: Arc<dyn MetricExtractor>) -> Self {
        Self {
            metrics: Some(extractor),
            quotes: None,
        }
    }

    pub fn quotes_only(extractor: Arc<dyn QuoteExtractor>) -> Self {
        Self {
            metrics: None,
            quotes: Some(extractor),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_none() && self.quotes.is_none()
    }
}

impl std::fmt::Debug for StageExtractors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageExtractors")
            .field("metrics", &self.metrics.as_ref().map(|e| e.name()))
            .field("quotes", &self.quotes.as_ref().map(|e| e.name()))
            .finish()
    }
}
