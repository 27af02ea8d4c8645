//! Command executor
//!
//! Runs one proposed command against the target and classifies the result
//! against the model's expectation.

use crate::ports::command_runner::CommandRunner;
use crate::ports::progress::RunProgressNotifier;
use curlgen_domain::{CommandOutcome, ExecutionOutcome, ProposedCommand, render_command};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Curl write-out appended to every command so the status code lands at the
/// end of stdout.
const STATUS_WRITE_OUT: &str = r#" -w "%{http_code}""#;

/// The API under test
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    /// Substituted for `{{API_URL}}`.
    pub api_url: String,
    /// Substituted for `{{API_KEY}}`.
    pub api_key: String,
}

impl Target {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

/// Executes proposed commands, one at a time
pub struct CommandExecutor {
    runner: Arc<dyn CommandRunner>,
    target: Target,
    execute: bool,
    timeout: Option<Duration>,
}

impl CommandExecutor {
    pub fn new(runner: Arc<dyn CommandRunner>, target: Target) -> Self {
        Self {
            runner,
            target,
            execute: true,
            timeout: None,
        }
    }

    /// Render only, never spawn.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.execute = !dry_run;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Render, run, and classify one command.
    ///
    /// Never fails: every problem is folded into the returned outcome so the
    /// caller can report it to the model.
    pub async fn execute(
        &self,
        proposed: &ProposedCommand,
        progress: &dyn RunProgressNotifier,
    ) -> CommandOutcome {
        let rendered =
            match render_command(&proposed.command, &self.target.api_url, &self.target.api_key) {
                Ok(rendered) => rendered,
                Err(e) => {
                    warn!("Skipping command that failed to render: {} ({})", proposed.command, e);
                    return CommandOutcome::RenderFailed {
                        command: proposed.command.clone(),
                        reason: e.to_string(),
                    };
                }
            };

        progress.on_command_start(&rendered);
        if !self.execute {
            debug!("Dry run, not executing: {}", rendered);
            return CommandOutcome::DryRun {
                rendered_command: rendered,
            };
        }

        let shell_command = format!("{}{}", rendered, STATUS_WRITE_OUT);
        match self.runner.run(&shell_command, self.timeout).await {
            Ok(output) => {
                let outcome = ExecutionOutcome::from_process(
                    rendered,
                    proposed.expected_success,
                    output.exit_code,
                    &output.stdout,
                    output.stderr,
                );
                debug!(
                    "Command finished: exit={:?} status={:?} matched={}",
                    outcome.exit_code,
                    outcome.http_status,
                    outcome.matched_expectation()
                );
                CommandOutcome::Executed(outcome)
            }
            Err(e) => {
                warn!("Failed to execute curl command: {} ({})", rendered, e);
                CommandOutcome::SpawnFailed {
                    rendered_command: rendered,
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::ports::command_runner::{CommandError, CommandOutput, CommandRunner};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Runner that replays scripted results and records what it was asked to run.
    pub(crate) struct FakeRunner {
        results: Mutex<VecDeque<Result<CommandOutput, CommandError>>>,
        pub(crate) commands: Mutex<Vec<String>>,
    }

    impl FakeRunner {
        pub(crate) fn new(results: Vec<Result<CommandOutput, CommandError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                commands: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn responding(stdout: &str) -> Result<CommandOutput, CommandError> {
            Ok(CommandOutput {
                exit_code: Some(0),
                stdout: stdout.to_string(),
                stderr: String::new(),
            })
        }

        pub(crate) fn spawned(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        async fn run(
            &self,
            command: &str,
            _timeout: Option<Duration>,
        ) -> Result<CommandOutput, CommandError> {
            self.commands.lock().unwrap().push(command.to_string());
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| FakeRunner::responding("200"))
        }
    }
}
