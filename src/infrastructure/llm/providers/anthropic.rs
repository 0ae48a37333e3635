//! Anthropic (Claude) messages provider

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ProviderConfig, read_body};
use crate::domain::traits::LlmProvider;
use crate::domain::types::{Message, Role};
use crate::infrastructure::llm::ProviderError;

const PROVIDER: &str = "anthropic";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Anthropic API request format
#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<&'a Message>,
}

/// Anthropic API response format.
///
/// `content` is accepted either as a bare string or as a list of content blocks.
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Option<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnthropicContent {
    Text(String),
    Blocks(Vec<AnthropicBlock>),
}

#[derive(Debug, Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

pub struct AnthropicProvider {
    config: ProviderConfig,
    http: Client,
}

impl AnthropicProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let http = config.http_client()?;
        Ok(Self { config, http })
    }
}

/// System messages travel in the top-level `system` field; the rest stay in order.
fn build_request<'a>(model: &'a str, conversation: &'a [Message]) -> AnthropicRequest<'a> {
    let system: Vec<&str> = conversation
        .iter()
        .filter(|msg| msg.role == Role::System)
        .map(|msg| msg.content.as_str())
        .collect();

    AnthropicRequest {
        model,
        max_tokens: MAX_TOKENS,
        system: (!system.is_empty()).then(|| system.join("\n\n")),
        messages: conversation
            .iter()
            .filter(|msg| msg.role != Role::System)
            .collect(),
    }
}

fn extract_reply(body: &str) -> Result<String, ProviderError> {
    let response: AnthropicResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::decode(PROVIDER, e))?;

    let text = match response.content {
        Some(AnthropicContent::Text(text)) => text,
        Some(AnthropicContent::Blocks(blocks)) => blocks
            .into_iter()
            .filter(|block| block.content_type == "text")
            .map(|block| block.text)
            .collect(),
        None => String::new(),
    };

    if text.is_empty() {
        return Err(ProviderError::empty(PROVIDER, "no content"));
    }
    Ok(text)
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn send(&self, model: &str, conversation: &[Message]) -> Result<String, ProviderError> {
        let request = build_request(model, conversation);
        let url = format!("{}/v1/messages", self.config.base_url);

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        let body = read_body(PROVIDER, response).await?;
        extract_reply(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_is_hoisted() {
        let convo = vec![
            Message::system("rules"),
            Message::user("task"),
            Message::assistant("[]"),
            Message::user(""),
        ];
        let json = serde_json::to_value(build_request("claude-3-5-sonnet-20241022", &convo)).unwrap();

        assert_eq!(json["system"], "rules");
        assert_eq!(json["max_tokens"], MAX_TOKENS);
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "task");
        assert_eq!(messages[1]["role"], "assistant");
    }

    #[test]
    fn test_no_system_field_without_system_message() {
        let convo = vec![Message::user("task")];
        let json = serde_json::to_value(build_request("m", &convo)).unwrap();
        assert!(json.get("system").is_none());
    }

    #[test]
    fn test_extract_plain_string_content() {
        let body = r#"{"content": "[{\"done\": true}]"}"#;
        assert_eq!(extract_reply(body).unwrap(), r#"[{"done": true}]"#);
    }

    #[test]
    fn test_extract_content_blocks() {
        let body = r#"{
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "[{\"shell\": "},
                {"type": "tool_use", "id": "x", "name": "n", "input": {}},
                {"type": "text", "text": "\"ls\"}]"}
            ],
            "stop_reason": "end_turn"
        }"#;
        assert_eq!(extract_reply(body).unwrap(), r#"[{"shell": "ls"}]"#);
    }

    #[test]
    fn test_missing_content_is_empty_response() {
        assert!(matches!(
            extract_reply(r#"{"id": "msg_1"}"#).unwrap_err(),
            ProviderError::EmptyResponse { .. }
        ));
        assert!(matches!(
            extract_reply(r#"{"content": []}"#).unwrap_err(),
            ProviderError::EmptyResponse { .. }
        ));
    }
}
