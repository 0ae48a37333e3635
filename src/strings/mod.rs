//! # Strings Module
//!
//! Centralizes operator-facing strings and the model prompt.

pub mod messages;
pub mod prompts;
