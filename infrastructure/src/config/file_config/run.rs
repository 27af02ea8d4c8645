//! Run configuration from TOML (`[run]` section)

use curlgen_application::RunParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw loop-control settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRunConfig {
    /// Maximum provider invocations per run.
    pub max_turns: usize,
    /// Run proposed commands (false = dry run).
    pub execute_commands: bool,
    /// Deadline per provider call, in seconds.
    pub provider_timeout_secs: Option<u64>,
    /// Deadline per command, in seconds.
    pub command_timeout_secs: Option<u64>,
    /// Retries for transient provider errors.
    pub max_retries: usize,
}

impl Default for FileRunConfig {
    fn default() -> Self {
        let params = RunParams::default();
        Self {
            max_turns: params.max_turns,
            execute_commands: params.execute_commands,
            provider_timeout_secs: None,
            command_timeout_secs: None,
            max_retries: params.max_retries,
        }
    }
}

impl FileRunConfig {
    pub fn to_run_params(&self) -> RunParams {
        RunParams::default()
            .with_max_turns(self.max_turns)
            .with_execute_commands(self.execute_commands)
            .with_provider_timeout(self.provider_timeout_secs.map(Duration::from_secs))
            .with_command_timeout(self.command_timeout_secs.map(Duration::from_secs))
            .with_max_retries(self.max_retries)
    }
}
