//! OpenAI-compatible API provider
//!
//! Serves both OpenAI and xAI, which differ only in base URL and key.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ProviderConfig, read_body};
use crate::domain::traits::LlmProvider;
use crate::domain::types::Message;
use crate::infrastructure::llm::ProviderError;

/// OpenAI API request format
#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

/// OpenAI API response format
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAICompatible {
    name: &'static str,
    config: ProviderConfig,
    http: Client,
}

impl OpenAICompatible {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let http = config.http_client()?;
        Ok(Self {
            name: config.kind.as_str(),
            config,
            http,
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }
}

fn extract_reply(provider: &'static str, body: &str) -> Result<String, ProviderError> {
    let response: OpenAIResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::decode(provider, e))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::empty(provider, "no choices"))?;

    Ok(choice.message.content.unwrap_or_default())
}

#[async_trait]
impl LlmProvider for OpenAICompatible {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, model: &str, conversation: &[Message]) -> Result<String, ProviderError> {
        let request = OpenAIRequest {
            model,
            messages: conversation,
        };

        let response = self
            .http
            .post(self.url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::transport(self.name, e))?;

        let body = read_body(self.name, response).await?;
        extract_reply(self.name, &body)
    }
}
