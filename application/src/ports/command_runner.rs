//! Command runner port
//!
//! Runs a rendered shell command and captures its output. The application
//! layer only classifies the result; spawning processes is an adapter concern.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors from spawning or waiting on a command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Failed to spawn command: {0}")]
    Spawn(String),

    #[error("Failed to wait for command: {0}")]
    Wait(String),

    #[error("Command timed out after {0:?}")]
    Timeout(Duration),
}

/// Captured output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Port for running shell commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        command: &str,
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, CommandError>;
}
