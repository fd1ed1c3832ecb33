//! Agent loop parameters: use case loop control.
//!
//! [`LoopParams`] groups the static parameters that control a run of
//! [`AgentLoop`](crate::use_cases::agent_loop::AgentLoop).

use super::retry_policy::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// System preamble used when none is configured.
pub const DEFAULT_PREAMBLE: &str = "You are a helpful assistant. \
Use the available tools when they help answer the user's question, \
and answer directly when they do not.";

/// Agent loop control parameters.
///
/// Controls the model invocation cap, the overall deadline and the retry
/// policy for unavailable backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopParams {
    /// System preamble placed ahead of the conversation.
    pub preamble: String,
    /// Maximum logical model invocations per run. Retries do not count.
    pub max_model_invocations: usize,
    /// Wall-clock budget for the whole run. `None` means unbounded.
    pub deadline: Option<Duration>,
    /// Backoff policy for `BackendUnavailable` errors.
    pub retry: RetryPolicy,
}

impl Default for LoopParams {
    fn default() -> Self {
        Self {
            preamble: DEFAULT_PREAMBLE.to_string(),
            max_model_invocations: 10,
            deadline: Some(Duration::from_secs(25)),
            retry: RetryPolicy::default(),
        }
    }
}

impl LoopParams {
    // ==================== Builder Methods ====================

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    pub fn with_max_model_invocations(mut self, max: usize) -> Self {
        self.max_model_invocations = max;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
