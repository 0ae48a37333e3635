//! # Run Report
//!
//! Turns the outcome of a run into the status line printed on stdout.

use crate::application::engine::{AbortReason, Outcome};
use crate::strings::messages;

pub fn status_line(outcome: &Outcome, max_turns: u32) -> String {
    match outcome {
        Outcome::Completed => messages::TASK_COMPLETE.to_string(),
        Outcome::Aborted(AbortReason::Provider(e)) => messages::provider_failed(&e.to_string()),
        Outcome::Aborted(AbortReason::Parse(e)) => messages::parse_failed(&e.to_string()),
        Outcome::TurnLimitReached => messages::turn_limit_reached(max_turns),
    }
}
