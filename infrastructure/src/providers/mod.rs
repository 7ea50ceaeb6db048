//! LLM provider adapters
//!
//! Each adapter implements the [`LlmProvider`] port for one HTTP API and is
//! compiled only when its cargo feature is enabled. [`ProviderFactory`]
//! picks the adapter by name and fails at construction time when the
//! provider is unknown, not compiled in, or has no API key.

#[cfg(feature = "anthropic")]
pub mod anthropic;
#[cfg(feature = "openai")]
pub mod openai;

use consensus_application::LlmProvider;
use consensus_domain::{Model, ProviderConfig};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised while building a provider
#[derive(Error, Debug)]
pub enum ProviderSetupError {
    #[error("Unknown provider '{0}' (expected 'anthropic' or 'openai')")]
    UnknownProvider(String),

    #[error("Provider '{0}' is not available in this build (enable the '{0}' feature)")]
    ProviderUnavailable(String),

    #[error("No API key for {provider}: set {env_var} or providers.{provider}.api_key")]
    MissingApiKey { provider: String, env_var: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Anthropic,
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = ProviderSetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "openai" | "gpt" => Ok(ProviderKind::OpenAi),
            _ => Err(ProviderSetupError::UnknownProvider(s.to_string())),
        }
    }
}

/// Resolve an API key: literal key first, then the named environment variable.
pub fn resolve_api_key(
    provider: ProviderKind,
    api_key: Option<&str>,
    env_var: &str,
) -> Result<String, ProviderSetupError> {
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        return Ok(key.to_string());
    }

    match std::env::var(env_var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(ProviderSetupError::MissingApiKey {
            provider: provider.to_string(),
            env_var: env_var.to_string(),
        }),
    }
}

/// Builds the configured provider adapter.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider by name.
    ///
    /// `model` falls back to the provider's configured default model.
    pub fn create(
        name: &str,
        model: Option<Model>,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn LlmProvider>, ProviderSetupError> {
        let kind: ProviderKind = name.parse()?;
        let model = match model {
            Some(model) => model,
            None => config
                .default_model(kind.as_str())
                .unwrap_or_default(),
        };

        let provider = Self::build(kind, model, config)?;
        info!(provider = %kind, model = %provider.model(), "Provider initialized");
        Ok(provider)
    }

    /// Create the configured default provider.
    pub fn create_default(
        model: Option<Model>,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn LlmProvider>, ProviderSetupError> {
        Self::create(&config.default, model, config)
    }

    #[cfg_attr(not(all(feature = "anthropic", feature = "openai")), allow(unused_variables))]
    fn build(
        kind: ProviderKind,
        model: Model,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn LlmProvider>, ProviderSetupError> {
        match kind {
            #[cfg(feature = "anthropic")]
            ProviderKind::Anthropic => Ok(Arc::new(anthropic::AnthropicProvider::new(
                model,
                &config.anthropic,
            )?)),
            #[cfg(feature = "openai")]
            ProviderKind::OpenAi => Ok(Arc::new(openai::OpenAiProvider::new(
                model,
                &config.openai,
            )?)),
            #[allow(unreachable_patterns)]
            other => Err(ProviderSetupError::ProviderUnavailable(
                other.as_str().to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNSET_ENV: &str = "PAPER_CONSENSUS_TEST_KEY_THAT_IS_NEVER_SET";

    fn config_without_keys() -> ProviderConfig {
        let mut config = ProviderConfig::default();
        config.anthropic.api_key_env = UNSET_ENV.to_string();
        config.openai.api_key_env = UNSET_ENV.to_string();
        config
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("anthropic".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert!(matches!(
            "bedrock".parse::<ProviderKind>(),
            Err(ProviderSetupError::UnknownProvider(name)) if name == "bedrock"
        ));
    }

    #[test]
    fn test_unknown_provider_fails_fast() {
        let result = ProviderFactory::create("mistral", None, &ProviderConfig::default());
        assert!(matches!(result, Err(ProviderSetupError::UnknownProvider(_))));
    }

    #[test]
    fn test_literal_key_wins() {
        let key = resolve_api_key(ProviderKind::Anthropic, Some("sk-test"), UNSET_ENV).unwrap();
        assert_eq!(key, "sk-test");
    }

    #[test]
    fn test_missing_key_is_error() {
        let result = resolve_api_key(ProviderKind::OpenAi, Some("  "), UNSET_ENV);
        assert!(matches!(
            result,
            Err(ProviderSetupError::MissingApiKey { provider, env_var })
                if provider == "openai" && env_var == UNSET_ENV
        ));
    }

    #[cfg(feature = "anthropic")]
    #[test]
    fn test_anthropic_without_key_fails_at_construction() {
        let result = ProviderFactory::create("anthropic", None, &config_without_keys());
        assert!(matches!(result, Err(ProviderSetupError::MissingApiKey { .. })));
    }

    #[cfg(not(feature = "anthropic"))]
    #[test]
    fn test_anthropic_unavailable_without_feature() {
        let result = ProviderFactory::create("anthropic", None, &config_without_keys());
        assert!(matches!(result, Err(ProviderSetupError::ProviderUnavailable(_))));
    }

    #[cfg(feature = "openai")]
    #[test]
    fn test_openai_uses_default_model() {
        let mut config = config_without_keys();
        config.openai.api_key = Some("sk-test".to_string());

        let provider = ProviderFactory::create("openai", None, &config).unwrap();
        assert_eq!(provider.model(), &Model::Gpt4oMini);
    }

    #[cfg(not(feature = "openai"))]
    #[test]
    fn test_openai_unavailable_without_feature() {
        let result = ProviderFactory::create("openai", None, &config_without_keys());
        assert!(matches!(result, Err(ProviderSetupError::ProviderUnavailable(_))));
    }
}
