use super::{ChatMessage, LLM, LLMConfig, LLMProvider, LLMResponse};
use crate::error::{Result, TitleError};
use async_trait::async_trait;
use reqwest;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Provider for OpenAI-compatible chat completion APIs (OpenAI, LMStudio)
pub struct ChatCompletionsProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatCompletionsChoice>,
    usage: Option<ChatCompletionsUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsUsage {
    total_tokens: u32,
}

impl ChatCompletionsProvider {
    pub fn new(config: LLMConfig) -> Result<Self> {
        if config.provider == LLMProvider::OpenAI && !config.has_api_key() {
            return Err(TitleError::Llm("OpenAI API key required".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl LLM for ChatCompletionsProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let endpoint = self.config.chat_endpoint();

        let request = ChatCompletionsRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending request to {:?} at {}", self.config.provider, endpoint);

        let mut builder = self.client.post(&endpoint).json(&request);
        if let Some(api_key) = self.config.api_key.as_deref().filter(|key| !key.trim().is_empty()) {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(TitleError::Llm(format!(
                "{:?} API error {}: {}",
                self.config.provider, status, text
            )));
        }

        let completion: ChatCompletionsResponse = response.json().await?;

        let content = completion
            .choices
            .first()
            .ok_or_else(|| TitleError::Llm(format!("No response from {:?}", self.config.provider)))?
            .message
            .content
            .clone();

        let tokens_used = completion.usage.map(|u| u.total_tokens);

        Ok(LLMResponse {
            content,
            tokens_used,
        })
    }

    fn provider_type(&self) -> LLMProvider {
        self.config.provider.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_requires_key() {
        let config = LLMConfig::default();
        assert!(ChatCompletionsProvider::new(config).is_err());
    }

    #[test]
    fn test_lmstudio_without_key() {
        let config = LLMConfig {
            provider: LLMProvider::LMStudio,
            ..LLMConfig::default()
        };
        let provider = ChatCompletionsProvider::new(config).unwrap();
        assert_eq!(provider.provider_type(), LLMProvider::LMStudio);
        assert_eq!(
            provider.config.chat_endpoint(),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Velvet Skyline"}}],"usage":{"total_tokens":42}}"#;
        let parsed: ChatCompletionsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "Velvet Skyline");
        assert_eq!(parsed.usage.map(|u| u.total_tokens), Some(42));
    }
}
