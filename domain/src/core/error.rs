//! Domain error types

use crate::tool::definition::PROPOSE_COMMANDS_TOOL;
use thiserror::Error;

/// Domain-level errors
///
/// All of these are recoverable from the point of view of a run: the loop
/// reports them and keeps going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed tool arguments: {0}")]
    MalformedToolArguments(String),

    #[error("Unknown tool `{0}`; only {tool} is available", tool = PROPOSE_COMMANDS_TOOL)]
    UnknownTool(String),

    #[error("Template render error: {0}")]
    TemplateRender(String),
}

impl DomainError {
    /// Check if this error came from the model's tool-call payload
    pub fn is_tool_call_error(&self) -> bool {
        matches!(
            self,
            DomainError::MalformedToolArguments(_) | DomainError::UnknownTool(_)
        )
    }
}
