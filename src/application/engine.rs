//! # Execution Engine
//!
//! The core loop that drives the agent: ask the model, parse its operations,
//! execute them, feed the transcript back, repeat.
//!
//! A run ends when the model replies with a lone `done`, when the provider or
//! the parser fails, or when the turn budget is spent. One provider call or one
//! operation batch is in flight at any time.

use anyhow::{Context, Result};

use crate::application::parsing::{ParseError, parse_operations};
use crate::domain::traits::LlmProvider;
use crate::domain::types::{Conversation, is_completion};
use crate::infrastructure::llm::ProviderError;
use crate::infrastructure::tools::executor::Executor;
use crate::strings::prompts::SYSTEM_PROMPT;

pub const DEFAULT_MAX_TURNS: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    pub model: String,
    /// Executed turns allowed before the run stops without completion.
    pub max_turns: u32,
}

/// Why a run stopped early.
#[derive(Debug)]
pub enum AbortReason {
    Provider(ProviderError),
    Parse(ParseError),
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::Provider(e) => write!(f, "provider error: {e}"),
            AbortReason::Parse(e) => write!(f, "parse error: {e}"),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    /// The model replied with exactly `[{"done": true}]`.
    Completed,
    Aborted(AbortReason),
    /// `max_turns` batches ran without a completion signal.
    TurnLimitReached,
}

#[derive(Debug)]
pub struct RunReport {
    pub outcome: Outcome,
    /// Number of batches executed and fed back to the model.
    pub turns: u32,
    pub conversation: Conversation,
}

pub struct Agent {
    provider: Box<dyn LlmProvider>,
    executor: Executor,
    settings: AgentSettings,
}

impl Agent {
    pub fn new(provider: Box<dyn LlmProvider>, executor: Executor, settings: AgentSettings) -> Self {
        Self {
            provider,
            executor,
            settings,
        }
    }

    /// Primary execution loop
    pub async fn run(&self, prompt: &str) -> Result<RunReport> {
        let mut conversation = Conversation::new(SYSTEM_PROMPT, prompt);
        let mut turns = 0;

        tracing::info!(
            provider = self.provider.name(),
            model = %self.settings.model,
            max_turns = self.settings.max_turns,
            "starting agent run"
        );

        let outcome = loop {
            if turns >= self.settings.max_turns {
                tracing::warn!(turns, "turn limit reached without completion");
                break Outcome::TurnLimitReached;
            }

            // 1. LLM Completion
            tracing::debug!(turn = turns + 1, messages = conversation.len(), "requesting reply");
            let reply = match self
                .provider
                .send(&self.settings.model, conversation.messages())
                .await
            {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::error!(turn = turns + 1, error = %e, "provider call failed");
                    break Outcome::Aborted(AbortReason::Provider(e));
                }
            };

            // 2. Parse
            let ops = match parse_operations(&reply) {
                Ok(ops) => ops,
                Err(e) => {
                    tracing::error!(turn = turns + 1, error = %e, "reply is not an operation batch");
                    tracing::debug!(reply = %reply, "unparsed reply");
                    break Outcome::Aborted(AbortReason::Parse(e));
                }
            };

            if is_completion(&ops) {
                tracing::info!(turns, "model signalled completion");
                break Outcome::Completed;
            }

            // 3. Execute
            tracing::info!(turn = turns + 1, operations = ops.len(), "executing batch");
            let executor = self.executor.clone();
            let transcript = tokio::task::spawn_blocking(move || executor.execute(&ops))
                .await
                .context("operation batch panicked")?;
            tracing::debug!(bytes = transcript.len(), "batch transcript ready");

            // 4. Feed back
            conversation.push_turn(reply, transcript);
            turns += 1;
        };

        Ok(RunReport {
            outcome,
            turns,
            conversation,
        })
    }
}
