//! OpenAI-compatible chat-completions provider
//!
//! Works with any endpoint that speaks the `/chat/completions` protocol
//! (OpenAI, LiteLLM proxies, DeepSeek, local gateways).
//!
//! Configuration:
//! - api_url: full chat-completions URL
//! - api_key: bearer credential (AI_API_KEY)
//! - model: model name, e.g. "gpt-4o-mini"

use super::{LlmProvider, LlmRequest, LlmResponse, ProviderError, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// OpenAI-compatible provider
pub struct OpenAiProvider {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    /// Create a provider for the given endpoint
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// JSON mode is only requested from models known to support it
    fn supports_json_mode(&self) -> bool {
        self.model.contains("gpt-4")
    }
}

/// OpenAI-compatible chat request
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// OpenAI-compatible chat response
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl OpenAiProvider {
    fn build_request(&self, request: &LlmRequest) -> ChatRequest {
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: request.system.clone(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            },
        ];

        let response_format = (request.json_response && self.supports_json_mode())
            .then_some(ResponseFormat {
                kind: "json_object",
            });

        ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: request.temperature,
            response_format,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, ProviderError> {
        let chat_request = self.build_request(request);
        let start = Instant::now();

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::HttpError(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ProviderError(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response.json().await?;
        let duration_ms = start.elapsed().as_millis() as u64;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?
            .message
            .content
            .unwrap_or_default();

        debug!(
            model = %self.model,
            duration_ms,
            content_len = content.len(),
            "Chat completion received"
        );

        let usage = chat_response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(LlmResponse {
            content,
            usage,
            duration_ms: Some(duration_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(model: &str) -> OpenAiProvider {
        OpenAiProvider::new(
            "https://api.openai.com/v1/chat/completions",
            "test_key",
            model,
            Duration::from_secs(30),
        )
        .unwrap()
    }

    #[test]
    fn test_provider_creation() {
        let provider = provider("gpt-4o-mini");
        assert_eq!(provider.model(), "gpt-4o-mini");
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_request_body_shape() {
        let request = LlmRequest::new("system text", "user text").with_temperature(0.2);
        let body = serde_json::to_value(provider("gpt-4").build_request(&request)).unwrap();

        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "system text");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "user text");
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_json_mode_only_for_capable_models() {
        let request = LlmRequest::new("s", "u").with_json_response();

        let body = serde_json::to_value(provider("gpt-4-turbo").build_request(&request)).unwrap();
        assert_eq!(body["response_format"]["type"], "json_object");

        let body = serde_json::to_value(provider("llama3").build_request(&request)).unwrap();
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_chat_response_parsing() {
        let json = r#"{
            "choices": [{"message": {"role": "assistant", "content": "[]"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content.as_deref(), Some("[]"));
        assert_eq!(response.usage.unwrap().total_tokens, 12);
    }
}
