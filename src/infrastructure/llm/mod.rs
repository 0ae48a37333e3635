//! # LLM Gateway
//!
//! A uniform `send(model, conversation) -> reply` capability over several
//! model vendors. The whole conversation is resent on every call, so traffic
//! grows quadratically with the number of turns.

pub mod providers;
mod types;

pub use types::{ProviderError, ProviderKind};
