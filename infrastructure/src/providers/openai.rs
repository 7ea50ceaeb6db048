//! OpenAI Chat Completions provider

use super::{ProviderKind, ProviderSetupError, resolve_api_key};
use async_trait::async_trait;
use consensus_application::{LlmProvider, ProviderError};
use consensus_domain::{Model, OpenAiProviderConfig, RawRun};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// GPT models through `POST /v1/chat/completions`.
pub struct OpenAiProvider {
    client: reqwest::Client,
    model: Model,
    api_key: String,
    base_url: String,
    max_tokens: u32,
}

impl OpenAiProvider {
    /// Build the client. Fails when no API key can be resolved.
    pub fn new(model: Model, config: &OpenAiProviderConfig) -> Result<Self, ProviderSetupError> {
        let api_key = resolve_api_key(
            ProviderKind::OpenAi,
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
            max_tokens: config.max_tokens,
        })
    }

    fn request_body<'a>(&'a self, system_prompt: &'a str, user_prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: self.model.as_str(),
            max_tokens: self.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<RawRun, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(model = %self.model, "POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
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

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        body.into_run()
    }
}

// ============================================================================
// OpenAI API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u64,
}

impl ChatResponse {
    fn into_run(self) -> Result<RawRun, ProviderError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("no choices returned".to_string()))?;
        Ok(RawRun::new(
            choice.message.content.unwrap_or_default(),
            self.usage.total_tokens,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiProvider {
        let config = OpenAiProviderConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        OpenAiProvider::new(Model::Gpt4o, &config).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let provider = provider();
        let body = serde_json::to_value(provider.request_body("sys", "usr")).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "sys");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "OR = 1.8"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 80, "completion_tokens": 12, "total_tokens": 92}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_run().unwrap(), RawRun::new("OR = 1.8", 92));
    }

    #[test]
    fn test_empty_choices_is_invalid() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            response.into_run(),
            Err(ProviderError::InvalidResponse(_))
        ));
    }
}
