//! Model Gateway port
//!
//! Defines the interface for asking a model backend for its next move.

use async_trait::async_trait;
use toolloop_domain::{Conversation, ModelResponse, ResponseParseError, ToolSchema};
use thiserror::Error;

/// Errors that can occur during a model backend call
///
/// Only [`GatewayError::BackendUnavailable`] is worth retrying; the other
/// variants will fail the same way on a second attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Transient: throttling, 5xx, network or timeout failures
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Permanent: malformed request, auth failure, unknown model
    #[error("Backend rejected request: {0}")]
    BackendRejected(String),

    /// The backend answered with something we cannot interpret
    #[error("Response parse error: {0}")]
    ResponseParse(String),
}

impl GatewayError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::BackendUnavailable(_))
    }
}

impl From<ResponseParseError> for GatewayError {
    fn from(e: ResponseParseError) -> Self {
        GatewayError::ResponseParse(e.to_string())
    }
}

/// Gateway to a model backend
///
/// One call per logical model invocation. Implementations translate the
/// conversation and tool schemas into the backend's wire format and parse the
/// reply into a [`ModelResponse`]. Gateways never retry on their own.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn invoke(
        &self,
        conversation: &Conversation,
        tools: &[ToolSchema],
    ) -> Result<ModelResponse, GatewayError>;

    /// Backend/model identifier for logs
    fn model_id(&self) -> &str {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unavailable_is_retryable() {
        assert!(GatewayError::BackendUnavailable("throttled".into()).is_retryable());
        assert!(!GatewayError::BackendRejected("access denied".into()).is_retryable());
        assert!(!GatewayError::ResponseParse("no blocks".into()).is_retryable());
    }

    #[test]
    fn test_from_parse_error() {
        let err: GatewayError = ResponseParseError::NoToolCalls.into();
        assert!(matches!(err, GatewayError::ResponseParse(_)));
    }
}
