//! # Messages
//!
//! Status lines printed to the operator on stdout.

pub const PROMPT_REQUIRED: &str = "prompt required";
pub const TASK_COMPLETE: &str = "Task complete";

pub fn provider_failed(err: &str) -> String {
    format!("error calling provider: {err}")
}

pub fn parse_failed(err: &str) -> String {
    format!("parse error: {err}")
}

pub fn turn_limit_reached(max_turns: u32) -> String {
    format!("turn limit reached ({max_turns}) without completion")
}
