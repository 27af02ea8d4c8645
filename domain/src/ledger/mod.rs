//! Run ledger: pass/fail accounting for one run.

use crate::tool::outcome::CommandOutcome;
use serde::{Deserialize, Serialize};

/// A command that did not meet the model's expectation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedCommand {
    pub command: String,
    pub reason: String,
}

/// Accumulated results of a run (Entity)
///
/// Owned by whoever starts the run and lent to the driver. Entries are only
/// ever appended, so a partially completed run still reports everything that
/// happened before it stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLedger {
    successful: Vec<String>,
    failed: Vec<FailedCommand>,
}

impl RunLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one command outcome.
    ///
    /// Render failures never produced a runnable command and are not recorded.
    pub fn record(&mut self, outcome: &CommandOutcome) {
        match outcome {
            CommandOutcome::Executed(executed) => {
                if executed.matched_expectation() {
                    self.record_success(&executed.rendered_command);
                } else {
                    self.record_failure(&executed.rendered_command, executed.mismatch_reason());
                }
            }
            CommandOutcome::DryRun { rendered_command } => self.record_success(rendered_command),
            CommandOutcome::SpawnFailed {
                rendered_command,
                reason,
            } => self.record_failure(rendered_command, format!("Execution failed: {}", reason)),
            CommandOutcome::RenderFailed { .. } => {}
        }
    }

    pub fn record_success(&mut self, command: impl Into<String>) {
        self.successful.push(command.into());
    }

    pub fn record_failure(&mut self, command: impl Into<String>, reason: impl Into<String>) {
        self.failed.push(FailedCommand {
            command: command.into(),
            reason: reason.into(),
        });
    }

    pub fn successful(&self) -> &[String] {
        &self.successful
    }

    pub fn failed(&self) -> &[FailedCommand] {
        &self.failed
    }

    pub fn total(&self) -> usize {
        self.successful.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::outcome::ExecutionOutcome;

    #[test]
    fn test_matched_execution_goes_to_successful() {
        let mut ledger = RunLedger::new();
        ledger.record(&CommandOutcome::Executed(ExecutionOutcome::from_process(
            "curl ok",
            true,
            Some(0),
            "200",
            "",
        )));
        assert_eq!(ledger.successful(), ["curl ok".to_string()]);
        assert!(ledger.failed().is_empty());
    }

    #[test]
    fn test_mismatch_goes_to_failed_with_reason() {
        let mut ledger = RunLedger::new();
        ledger.record(&CommandOutcome::Executed(ExecutionOutcome::from_process(
            "curl boom",
            true,
            Some(0),
            "500",
            "",
        )));
        assert_eq!(ledger.failed().len(), 1);
        assert_eq!(ledger.failed()[0].command, "curl boom");
        assert!(ledger.failed()[0].reason.contains("Expected success: true"));
        assert!(ledger.failed()[0].reason.contains("Actual success: false"));
    }

    #[test]
    fn test_spawn_failure_reason() {
        let mut ledger = RunLedger::new();
        ledger.record(&CommandOutcome::SpawnFailed {
            rendered_command: "curl x".to_string(),
            reason: "sh not found".to_string(),
        });
        assert_eq!(ledger.failed()[0].reason, "Execution failed: sh not found");
    }

    #[test]
    fn test_render_failure_not_recorded() {
        let mut ledger = RunLedger::new();
        ledger.record(&CommandOutcome::RenderFailed {
            command: "curl {{API_URL".to_string(),
            reason: "unterminated".to_string(),
        });
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_entries_accumulate_in_order() {
        let mut ledger = RunLedger::new();
        ledger.record_success("a");
        ledger.record_failure("b", "r");
        ledger.record_success("c");
        assert_eq!(ledger.successful(), ["a".to_string(), "c".to_string()]);
        assert_eq!(ledger.total(), 3);
    }
}
