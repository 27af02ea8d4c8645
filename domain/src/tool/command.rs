//! Proposed commands parsed from the tool-call payload.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One curl command proposed by the model (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedCommand {
    /// Command text, possibly containing `{{API_URL}}` / `{{API_KEY}}`.
    pub command: String,
    /// Free-form rationale. Models occasionally omit it.
    #[serde(default)]
    pub explanation: String,
    /// Whether the model expects the command to succeed.
    pub expected_success: bool,
}

impl ProposedCommand {
    pub fn new(command: impl Into<String>, expected_success: bool) -> Self {
        Self {
            command: command.into(),
            explanation: String::new(),
            expected_success,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}

/// The full argument object of a `generateCurlCommands` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandBatch {
    pub commands: Vec<ProposedCommand>,
}

impl CommandBatch {
    /// Parse tool-call arguments.
    ///
    /// Accepts the decoded JSON object, or a JSON string holding one (some
    /// providers double-encode arguments).
    pub fn from_arguments(arguments: &Value) -> Result<Self, DomainError> {
        match arguments {
            Value::String(raw) => serde_json::from_str(raw)
                .map_err(|e| DomainError::MalformedToolArguments(e.to_string())),
            other => Self::deserialize(other)
                .map_err(|e| DomainError::MalformedToolArguments(e.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
