//! # Domain Types
//!
//! Common data structures used across the application logic: the chat
//! messages exchanged with a model, the append-only conversation, and the
//! operations a model can ask the agent to perform.

use serde::Serialize;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A chat message. Never mutated once it is part of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only history of a single agent run.
///
/// Always starts with the protocol instructions followed by the task prompt,
/// then grows by one assistant reply and one user transcript per turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system), Message::user(prompt)],
        }
    }

    /// Record an executed turn: the raw model reply, then the execution transcript.
    pub fn push_turn(&mut self, reply: impl Into<String>, transcript: impl Into<String>) {
        self.messages.push(Message::assistant(reply));
        self.messages.push(Message::user(transcript));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

/// A single action requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Run a command line through the shell.
    Shell { command: String },
    /// Replace the whole content of a file, creating it if needed.
    Edit { path: String, content: String },
    /// Completion signal. Only meaningful as the sole element of a batch.
    Done,
    /// An element that requested nothing.
    Noop,
}

impl Operation {
    pub fn is_done(&self) -> bool {
        matches!(self, Operation::Done)
    }
}

/// True when a batch is exactly one `Done`, the only shape that ends a run.
pub fn is_completion(batch: &[Operation]) -> bool {
    matches!(batch, [op] if op.is_done())
}
