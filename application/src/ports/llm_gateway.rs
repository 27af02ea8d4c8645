//! LLM provider ports
//!
//! Defines how the application layer talks to model providers. One
//! [`LlmProvider`] exists per protocol family; a [`ModelCatalog`] lists the
//! models a provider can serve.

use async_trait::async_trait;
use curlgen_domain::{LlmResponse, Message, ProviderKind, ProviderModel, ToolDefinition};
use thiserror::Error;

/// Errors that can occur while talking to a provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    /// Errors worth retrying: throttling, server-side failures, and network trouble.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::RateLimited(_)
            | GatewayError::ConnectionError(_)
            | GatewayError::Timeout => true,
            GatewayError::RequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// One provider invocation: the full history plus the declared tools.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// Canonical model id sent over the wire.
    pub model: &'a str,
    pub messages: &'a [Message],
    /// Empty when the model rejects tool declarations.
    pub tools: &'a [ToolDefinition],
}

/// A model provider speaking one protocol family
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Protocol family this provider speaks
    fn kind(&self) -> ProviderKind;

    /// Send the conversation and return the normalized reply
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<LlmResponse, GatewayError>;
}

/// Source of a provider's model listing
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    async fn list_models(&self) -> Result<Vec<ProviderModel>, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(GatewayError::Timeout.is_transient());
        assert!(GatewayError::RateLimited("slow down".to_string()).is_transient());
        assert!(GatewayError::ConnectionError("reset".to_string()).is_transient());
        assert!(
            GatewayError::RequestFailed {
                status: 503,
                message: "overloaded".to_string()
            }
            .is_transient()
        );
        assert!(
            !GatewayError::RequestFailed {
                status: 400,
                message: "bad request".to_string()
            }
            .is_transient()
        );
        assert!(!GatewayError::Authentication("bad key".to_string()).is_transient());
        assert!(!GatewayError::InvalidResponse("no choices".to_string()).is_transient());
    }

    #[test]
    fn test_request_failed_display() {
        let err = GatewayError::RequestFailed {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Request failed with status 500: boom");
    }
}
