//! Progress notification port
//!
//! Defines the interface for reporting what the loop is doing while a run
//! is in flight.

use crate::use_cases::generate_commands::Termination;
use curlgen_domain::CommandOutcome;

/// Callback for progress updates during a run
///
/// Implementations live in the presentation layer. Every method has a no-op
/// default so implementors only override what they display.
pub trait RunProgressNotifier: Send + Sync {
    /// Called before each provider invocation (1-based turn number)
    fn on_turn_start(&self, _turn: usize) {}

    /// Called when the provider reply has arrived
    fn on_turn_end(&self, _turn: usize) {}

    /// Called with any text the model produced in a turn
    fn on_assistant_text(&self, _text: &str) {}

    /// Called when a provider call is about to be retried
    fn on_retry(&self, _attempt: usize, _error: &str) {}

    /// Called when a tool call was not honored (unknown tool or bad payload)
    fn on_tool_call_skipped(&self, _tool_use_id: &str, _reason: &str) {}

    /// Called right before a rendered command is run
    fn on_command_start(&self, _rendered: &str) {}

    /// Called after each proposed command has been handled
    fn on_command_complete(&self, _outcome: &CommandOutcome) {}

    /// Called when the model ends the conversation (not at the turn bound)
    fn on_finished(&self, _termination: Termination) {}

    /// Called when the run stops at its turn bound
    fn on_turn_limit(&self, _max_turns: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl RunProgressNotifier for NoProgress {}
