//! Tool Server port
//!
//! Defines the interface for listing and executing tools.

use async_trait::async_trait;
use toolloop_domain::{CorrelationError, ToolCallRequest, ToolResult, ToolSchema};
use thiserror::Error;

/// Fatal fault while executing a tool-call batch.
///
/// Ordinary tool failures are never reported here: they come back as
/// error [`ToolResult`]s.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolServerError {
    #[error("Batch correlation failed: {0}")]
    Correlation(#[from] CorrelationError),

    #[error("Tool task failed: {0}")]
    TaskFailed(String),
}

/// Port for tool execution
///
/// This port defines how the application layer lists and runs tools.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolServerPort: Send + Sync {
    /// Schemas of all registered tools, in registration order
    fn describe_tools(&self) -> Vec<ToolSchema>;

    /// Execute one tool call. Never fails: errors become error results.
    async fn execute(&self, request: &ToolCallRequest) -> ToolResult;

    /// Execute a batch of calls concurrently.
    ///
    /// Returns exactly one result per request, in request order, each
    /// carrying its request's id.
    async fn execute_batch(
        &self,
        requests: &[ToolCallRequest],
    ) -> Result<Vec<ToolResult>, ToolServerError>;
}
