//! # Infrastructure Layer
//!
//! Handles interactions with external systems: model vendors over HTTP, the
//! local shell and the filesystem.

pub mod llm;
pub mod tools;
