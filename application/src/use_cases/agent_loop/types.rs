//! Type definitions for the AgentLoop use case.

use crate::ports::model_gateway::GatewayError;
use crate::ports::tool_server::ToolServerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use toolloop_domain::Conversation;

/// Machine-readable failure kind, serialized snake_case in outbound bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    IterationLimitExceeded,
    DeadlineExceeded,
    BackendUnavailable,
    BackendRejected,
    ResponseParse,
    ToolServerFault,
    Cancelled,
}

impl FailureKind {
    pub fn as_str(&self) -> &str {
        match self {
            FailureKind::IterationLimitExceeded => "iteration_limit_exceeded",
            FailureKind::DeadlineExceeded => "deadline_exceeded",
            FailureKind::BackendUnavailable => "backend_unavailable",
            FailureKind::BackendRejected => "backend_rejected",
            FailureKind::ResponseParse => "response_parse",
            FailureKind::ToolServerFault => "tool_server_fault",
            FailureKind::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal failure of an agent loop run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentLoopError {
    #[error("Iteration limit exceeded after {invocations} model invocations")]
    IterationLimitExceeded { invocations: usize },

    #[error("Deadline of {}ms exceeded after {}ms", .deadline.as_millis(), .elapsed.as_millis())]
    DeadlineExceeded { elapsed: Duration, deadline: Duration },

    #[error("Backend unavailable after {attempts} attempts: {message}")]
    BackendUnavailable { attempts: u32, message: String },

    #[error("Backend rejected request: {0}")]
    BackendRejected(String),

    #[error("Response parse error: {0}")]
    ResponseParse(String),

    #[error("Tool server fault: {0}")]
    ToolServerFault(#[from] ToolServerError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl AgentLoopError {
    /// Build from a gateway error that will not be retried further.
    pub fn from_gateway(error: GatewayError, attempts: u32) -> Self {
        match error {
            GatewayError::BackendUnavailable(message) => {
                AgentLoopError::BackendUnavailable { attempts, message }
            }
            GatewayError::BackendRejected(message) => AgentLoopError::BackendRejected(message),
            GatewayError::ResponseParse(message) => AgentLoopError::ResponseParse(message),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            AgentLoopError::IterationLimitExceeded { .. } => FailureKind::IterationLimitExceeded,
            AgentLoopError::DeadlineExceeded { .. } => FailureKind::DeadlineExceeded,
            AgentLoopError::BackendUnavailable { .. } => FailureKind::BackendUnavailable,
            AgentLoopError::BackendRejected(_) => FailureKind::BackendRejected,
            AgentLoopError::ResponseParse(_) => FailureKind::ResponseParse,
            AgentLoopError::ToolServerFault(_) => FailureKind::ToolServerFault,
            AgentLoopError::Cancelled => FailureKind::Cancelled,
        }
    }

    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AgentLoopError::Cancelled)
    }
}

/// Output from a successful AgentLoop run
#[derive(Debug, Clone)]
pub struct AgentLoopOutput {
    /// The model's final answer
    pub answer: String,
    /// Full transcript of the run
    pub conversation: Conversation,
    /// Logical model invocations (retries excluded)
    pub model_invocations: usize,
    /// Tool calls executed across all batches
    pub tool_executions: usize,
    pub elapsed: Duration,
}
