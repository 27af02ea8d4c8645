//! Run parameters: conversation loop control.
//!
//! [`RunParams`] groups the static parameters of one
//! [`GenerateCommandsUseCase`](crate::use_cases::generate_commands::GenerateCommandsUseCase)
//! run. These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParams {
    /// Maximum number of provider invocations in one run.
    pub max_turns: usize,
    /// When false, commands are rendered but never spawned (dry run).
    pub execute_commands: bool,
    /// Deadline for a single provider call.
    pub provider_timeout: Option<Duration>,
    /// Deadline for a single command.
    pub command_timeout: Option<Duration>,
    /// Retries for transient provider errors. Zero disables retrying.
    pub max_retries: usize,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            max_turns: 10,
            execute_commands: true,
            provider_timeout: None,
            command_timeout: None,
            max_retries: 0,
        }
    }
}

impl RunParams {
    // ==================== Builder Methods ====================

    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }

    pub fn with_execute_commands(mut self, execute: bool) -> Self {
        self.execute_commands = execute;
        self
    }

    pub fn dry_run(self) -> Self {
        self.with_execute_commands(false)
    }

    pub fn with_provider_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = RunParams::default();
        assert_eq!(params.max_turns, 10);
        assert!(params.execute_commands);
        assert!(params.provider_timeout.is_none());
        assert!(params.command_timeout.is_none());
        assert_eq!(params.max_retries, 0);
    }

    #[test]
    fn test_builder_chain() {
        let params = RunParams::default()
            .with_max_turns(3)
            .dry_run()
            .with_provider_timeout(Some(Duration::from_secs(60)))
            .with_max_retries(2);
        assert_eq!(params.max_turns, 3);
        assert!(!params.execute_commands);
        assert_eq!(params.provider_timeout, Some(Duration::from_secs(60)));
        assert_eq!(params.max_retries, 2);
    }
}
