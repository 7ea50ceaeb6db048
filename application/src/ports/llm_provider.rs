//! LLM provider port
//!
//! Defines the single operation the consensus engine needs from an LLM:
//! one system prompt and one user prompt in, response text and token count
//! out. Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use consensus_domain::{Model, RawRun};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during a single provider call
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Other error: {0}")]
    Other(String),
}

/// A chat-completion style LLM client.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model every call is sent to
    fn model(&self) -> &Model;

    /// Send one system/user prompt pair and wait for the full response.
    async fn complete(&self, system_prompt: &str, user_prompt: &str)
    -> Result<RawRun, ProviderError>;
}
