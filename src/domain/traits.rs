//! # Domain Traits
//!
//! Abstract interfaces for core system components.
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;

use crate::domain::types::Message;
use crate::infrastructure::llm::ProviderError;

/// Abstract interface for an LLM Provider
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name used in logs and errors (e.g. "openai").
    fn name(&self) -> &'static str;

    /// Send the whole conversation and return the assistant's reply text.
    async fn send(&self, model: &str, conversation: &[Message]) -> Result<String, ProviderError>;
}
