//! # Tools Module
//!
//! Local execution of model-requested operations (shell, filesystem).

pub mod executor;
