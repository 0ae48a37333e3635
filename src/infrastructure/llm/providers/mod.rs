//! # LLM Providers
//!
//! Contains implementations for specific LLM providers:
//! - OpenAI-compatible chat completions (OpenAI, xAI)
//! - Anthropic messages
//! - Gemini generateContent
//!
//! Each one implements [`LlmProvider`]; [`build`] picks the implementation for a
//! [`ProviderKind`] once at startup.

mod anthropic;
mod gemini;
mod openai;

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::domain::traits::LlmProvider;
use crate::infrastructure::llm::{ProviderError, ProviderKind};

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAICompatible;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Per-provider overrides coming from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Base URL (for non-default endpoints)
    pub endpoint: Option<String>,
    /// Timeout in seconds
    pub timeout: Option<u64>,
}

/// Resolved configuration for a provider
#[derive(Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// API key
    pub api_key: String,
    /// Base URL without trailing slash
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderConfig {
    /// Resolve the credential from the process environment.
    pub fn from_env(kind: ProviderKind, settings: &ProviderSettings) -> Result<Self, ProviderError> {
        Self::resolve(kind, settings, |var| std::env::var(var).ok())
    }

    /// Resolve the credential through `lookup`. An unset or empty key is fatal.
    pub fn resolve(
        kind: ProviderKind,
        settings: &ProviderSettings,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ProviderError> {
        let var = kind.credential_var();
        let api_key = lookup(var)
            .filter(|key| !key.is_empty())
            .ok_or(ProviderError::MissingCredential { var })?;

        let base_url = settings
            .endpoint
            .as_deref()
            .unwrap_or(kind.default_endpoint())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            kind,
            api_key,
            base_url,
            timeout: Duration::from_secs(settings.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }

    fn http_client(&self) -> Result<Client, ProviderError> {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ProviderError::transport(self.kind.as_str(), e))
    }
}

/// Build the gateway for `kind`. Fails before any network traffic when the
/// credential is missing.
pub fn build(
    kind: ProviderKind,
    settings: &ProviderSettings,
) -> Result<Box<dyn LlmProvider>, ProviderError> {
    let config = ProviderConfig::from_env(kind, settings)?;
    from_config(config)
}

pub fn from_config(config: ProviderConfig) -> Result<Box<dyn LlmProvider>, ProviderError> {
    tracing::debug!(provider = %config.kind, base_url = %config.base_url, "building provider");
    let provider: Box<dyn LlmProvider> = match config.kind {
        // xAI uses OpenAI-compatible API
        ProviderKind::OpenAI | ProviderKind::XAI => Box::new(OpenAICompatible::new(config)?),
        ProviderKind::Anthropic => Box::new(AnthropicProvider::new(config)?),
        ProviderKind::Gemini => Box::new(GeminiProvider::new(config)?),
    };
    Ok(provider)
}

/// Read the response body, turning a non-success status into [`ProviderError::Http`].
async fn read_body(provider: &'static str, response: reqwest::Response) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::transport(provider, e.without_url()))?;

    check_status(provider, status, body)
}

/// Pass a success body through untouched; anything else is never treated as a reply.
fn check_status(provider: &'static str, status: StatusCode, body: String) -> Result<String, ProviderError> {
    if !status.is_success() {
        return Err(ProviderError::Http {
            provider,
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    Ok(body)
}

/// Extract `error.message` (prefixed by `error.type` when present) from a
/// vendor error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    let Some(error) = json.get("error") else {
        return body.to_string();
    };

    match (
        error.get("type").and_then(|t| t.as_str()),
        error.get("message").and_then(|m| m.as_str()),
    ) {
        (Some(kind), Some(message)) => format!("{kind}: {message}"),
        (None, Some(message)) => message.to_string(),
        _ => body.to_string(),
    }
}
