//! # Domain Layer
//!
//! Core definitions, types, and traits that define the business domain of the application.
//! Independent of specific providers, serving as the contract for other layers.

pub mod config;
pub mod traits;
pub mod types;
