//! Raw quote records produced by extractors

use serde::{Deserialize, Serialize};

/// One quote as extracted from a single response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Quote text as written in the response
    pub text: String,
    /// Who said it, e.g. `Informant 12`
    #[serde(default)]
    pub informant: String,
    /// Role or setting attached to the attribution
    #[serde(default)]
    pub context: String,
}

impl QuoteRecord {
    pub fn new(
        text: impl Into<String>,
        informant: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            informant: informant.into(),
            context: context.into(),
        }
    }
}
