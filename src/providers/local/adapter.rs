use async_trait::async_trait;
use reqwest::Client;

use super::models::*;
use crate::config::LocalConfig;
use crate::models::Message;
use crate::providers::traits::ReplyProvider;
use crate::providers::types::{ChatMessage, ProviderError};

/// Non-streaming client for an OpenAI-compatible `/v1/chat/completions`
/// endpoint (llama.cpp, Ollama, vLLM and friends).
pub struct LocalProvider {
    client: Client,
    config: LocalConfig,
}

impl LocalProvider {
    pub fn new(config: LocalConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn build_messages(system_prompt: Option<&str>, messages: &[ChatMessage]) -> Vec<OpenAiMessage> {
        let mut result = Vec::new();

        if let Some(prompt) = system_prompt {
            if !prompt.is_empty() {
                result.push(OpenAiMessage {
                    role: "system".to_string(),
                    content: Some(prompt.to_string()),
                });
            }
        }

        for msg in messages {
            result.push(OpenAiMessage {
                role: msg.role.as_str().to_string(),
                content: Some(msg.content.clone()),
            });
        }

        result
    }

    fn build_auth_header(api_key: Option<&str>) -> Option<String> {
        match api_key {
            Some(key) if !key.is_empty() => Some(format!("Bearer {}", key)),
            _ => None,
        }
    }

    fn parse_error_message(status: reqwest::StatusCode, body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            return format!("HTTP {}: {}", status.as_u16(), parsed.error.message);
        }
        format!("HTTP {}: Request failed", status.as_u16())
    }
}

#[async_trait]
impl ReplyProvider for LocalProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn generate(&self, history: &[Message]) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.as_str().trim_end_matches('/')
        );

        let chat_messages: Vec<ChatMessage> = history.iter().map(ChatMessage::from).collect();
        let openai_request = OpenAiRequest {
            model: self.config.model.clone(),
            messages: Self::build_messages(self.config.system_prompt.as_deref(), &chat_messages),
            stream: false,
        };

        let mut req = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&openai_request);

        if let Some(auth) = Self::build_auth_header(self.config.api_key.as_deref()) {
            req = req.header("Authorization", auth);
        }

        tracing::debug!(%url, model = %self.config.model, turns = history.len(), "requesting completion");

        let response = req
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ProviderError::AuthError("Invalid API key".to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::RequestFailed(Self::parse_error_message(
                status, &body,
            )));
        }

        let openai_response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let content = openai_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ProviderError::InvalidResponse(
                "No content in response".to_string(),
            ));
        }

        Ok(content)
    }
}
