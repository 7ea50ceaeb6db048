//! Provider configuration types.
//!
//! These types define the shape of provider settings. Loading them from
//! files or the environment is an infrastructure concern.

use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Provider used when none is configured.
pub const DEFAULT_PROVIDER: &str = "anthropic";

/// Top-level provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Default provider name: "anthropic" or "openai".
    pub default: String,
    /// Anthropic API settings.
    pub anthropic: AnthropicProviderConfig,
    /// OpenAI API settings.
    pub openai: OpenAiProviderConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_PROVIDER.to_string(),
            anthropic: AnthropicProviderConfig::default(),
            openai: OpenAiProviderConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Default model for a provider name, if the provider is known.
    pub fn default_model(&self, provider: &str) -> Option<Model> {
        match provider {
            "anthropic" => Some(Model::from(self.anthropic.default_model.as_str())),
            "openai" => Some(Model::from(self.openai.default_model.as_str())),
            _ => None,
        }
    }
}

/// Anthropic API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicProviderConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key (prefer the environment variable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    /// Max tokens per response (default: 4096).
    pub max_tokens: u32,
    /// Anthropic API version header.
    pub api_version: String,
    /// Model used when none is given on the command line.
    pub default_model: String,
}

impl Default for AnthropicProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 4096,
            api_version: "2023-06-01".to_string(),
            default_model: Model::ClaudeSonnet4.to_string(),
        }
    }
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiProviderConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (prefer the environment variable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API.
    pub base_url: String,
    /// Max tokens per response (default: 4096).
    pub max_tokens: u32,
    /// Model used when none is given on the command line.
    pub default_model: String,
}

impl Default for OpenAiProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 4096,
            default_model: Model::Gpt4oMini.to_string(),
        }
    }
}
