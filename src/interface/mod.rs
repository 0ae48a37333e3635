//! # Interface Layer
//!
//! The operator-facing surface: command-line flags and how a run is reported.

pub mod cli;
pub mod report;
