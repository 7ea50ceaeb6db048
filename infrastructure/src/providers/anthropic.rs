//! Anthropic Messages API provider

use super::{ProviderKind, ProviderSetupError, resolve_api_key};
use async_trait::async_trait;
use consensus_application::{LlmProvider, ProviderError};
use consensus_domain::{AnthropicProviderConfig, Model, RawRun};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Claude models through `POST /v1/messages`.
pub struct AnthropicProvider {
    client: reqwest::Client,
    model: Model,
    api_key: String,
    base_url: String,
    api_version: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Build the client. Fails when no API key can be resolved.
    pub fn new(model: Model, config: &AnthropicProviderConfig) -> Result<Self, ProviderSetupError> {
        let api_key = resolve_api_key(
            ProviderKind::Anthropic,
            config.api_key.as_deref(),
            &config.api_key_env,
        )?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderSetupError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            model,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn request_body<'a>(&'a self, system_prompt: &'a str, user_prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: self.model.as_str(),
            max_tokens: self.max_tokens,
            system: system_prompt,
            messages: vec![Message {
                role: "user",
                content: user_prompt,
            }],
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<RawRun, ProviderError> {
        let url = format!("{}/v1/messages", self.base_url);
        debug!(model = %self.model, "POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&self.request_body(system_prompt, user_prompt))
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(body.into_run())
    }
}

// ============================================================================
// Anthropic API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

impl MessagesResponse {
    /// Text of all text blocks, tokens in plus out.
    fn into_run(self) -> RawRun {
        let text = self
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");
        RawRun::new(text, self.usage.input_tokens + self.usage.output_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> AnthropicProvider {
        let config = AnthropicProviderConfig {
            api_key: Some("sk-ant-test".to_string()),
            base_url: "http://localhost:9999/".to_string(),
            ..Default::default()
        };
        AnthropicProvider::new(Model::ClaudeHaiku35, &config).unwrap()
    }

    #[test]
    fn test_new_trims_base_url() {
        let provider = provider();
        assert_eq!(provider.base_url, "http://localhost:9999");
        assert_eq!(provider.max_tokens, 4096);
    }

    #[test]
    fn test_request_body_shape() {
        let provider = provider();
        let body = serde_json::to_value(provider.request_body("be exact", "β?")).unwrap();

        assert_eq!(body["model"], "claude-3-5-haiku-20241022");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["system"], "be exact");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "β?");
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "id": "msg_1",
            "model": "claude-3-5-haiku-20241022",
            "content": [
                {"type": "text", "text": "β = 0.21"},
                {"type": "tool_use", "id": "t1", "name": "x", "input": {}},
                {"type": "text", "text": ", p < 0.05"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 120, "output_tokens": 30}
        }"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        let run = response.into_run();

        assert_eq!(run.text, "β = 0.21, p < 0.05");
        assert_eq!(run.tokens, 150);
    }

    #[test]
    fn test_response_without_usage() {
        let response: MessagesResponse =
            serde_json::from_str(r#"{"content": [{"type": "text", "text": "ok"}]}"#).unwrap();
        assert_eq!(response.into_run(), RawRun::new("ok", 0));
    }
}
