//! Type definitions for the GenerateCommands use case.

use crate::config::RunParams;
use crate::ports::llm_gateway::GatewayError;
use crate::registry::RegistryError;
use crate::use_cases::execute_command::Target;
use thiserror::Error;

/// Errors that end a run early
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Provider invocation failed for {model}: {source}")]
    ProviderInvocation {
        model: String,
        #[source]
        source: GatewayError,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunError::Cancelled)
    }

    /// Check if this error was raised before the first provider call
    pub fn is_resolution_error(&self) -> bool {
        matches!(self, RunError::Registry(_))
    }
}

/// Input for the GenerateCommands use case
#[derive(Debug, Clone)]
pub struct GenerateCommandsInput {
    /// Model name as typed by the user (display name or API id).
    pub model: String,
    /// Rendered opening prompt.
    pub prompt: String,
    pub target: Target,
    pub params: RunParams,
}

impl GenerateCommandsInput {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, target: Target) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            target,
            params: RunParams::default(),
        }
    }

    pub fn with_params(mut self, params: RunParams) -> Self {
        self.params = params;
        self
    }
}

/// Why the conversation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The provider sent its natural stop signal with no tool call pending.
    Completed,
    /// The turn carried no tool call under some other stop signal.
    FinalAnswer,
    /// The turn bound was reached while the model still wanted tools.
    TurnLimit,
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::Completed => "completed",
            Termination::FinalAnswer => "final_answer",
            Termination::TurnLimit => "turn_limit",
        }
    }
}

/// Output of a run
#[derive(Debug, Clone)]
pub struct GenerateCommandsOutput {
    pub termination: Termination,
    /// Provider invocations made.
    pub turns: usize,
    /// Text of the last assistant turn.
    pub final_text: String,
    /// Canonical id of the model that served the run.
    pub model_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_error_cancelled() {
        let error = RunError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
        assert!(error.is_cancelled());
        assert!(!error.is_resolution_error());
    }

    #[test]
    fn test_unknown_model_is_resolution_error() {
        let error: RunError = RegistryError::UnknownModel("nope".to_string()).into();
        assert!(error.is_resolution_error());
        assert!(error.to_string().starts_with("Unknown model: nope"));
    }

    #[test]
    fn test_provider_invocation_display() {
        let error = RunError::ProviderInvocation {
            model: "gpt-4o".to_string(),
            source: GatewayError::Authentication("invalid key".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "Provider invocation failed for gpt-4o: Authentication failed: invalid key"
        );
    }
}
