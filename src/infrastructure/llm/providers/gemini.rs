//! Gemini generateContent provider
//!
//! Gemini has no system or assistant roles: system text is sent as a user
//! turn and assistant turns use the `model` role.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ProviderConfig, read_body};
use crate::domain::traits::LlmProvider;
use crate::domain::types::{Message, Role};
use crate::infrastructure::llm::ProviderError;

const PROVIDER: &str = "gemini";

/// Gemini API request format
#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

/// Gemini content (message)
#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: String,
}

pub struct GeminiProvider {
    config: ProviderConfig,
    http: Client,
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let http = config.http_client()?;
        Ok(Self { config, http })
    }

    fn url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, model, self.config.api_key
        )
    }
}

fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::System | Role::User => "user",
        Role::Assistant => "model",
    }
}

fn build_request(conversation: &[Message]) -> GeminiRequest<'_> {
    GeminiRequest {
        contents: conversation
            .iter()
            .map(|msg| GeminiContent {
                role: gemini_role(msg.role),
                parts: vec![GeminiPart { text: &msg.content }],
            })
            .collect(),
    }
}

fn extract_reply(body: &str) -> Result<String, ProviderError> {
    let response: GeminiResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::decode(PROVIDER, e))?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or_else(|| ProviderError::empty(PROVIDER, "no response"))
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn send(&self, model: &str, conversation: &[Message]) -> Result<String, ProviderError> {
        let request = build_request(conversation);

        let response = self
            .http
            .post(self.url(model))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            // reqwest errors carry the URL, which holds the key
            .map_err(|e| ProviderError::transport(PROVIDER, e.without_url()))?;

        let body = read_body(PROVIDER, response).await?;
        extract_reply(&body)
    }
}
