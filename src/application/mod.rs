//! # Application Layer
//!
//! Contains the core logic of the agent: the execution loop, reply parsing,
//! and logging setup.

pub mod engine;
pub mod logging;
pub mod parsing;
