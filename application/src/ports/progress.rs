//! Agent loop progress port.
//!
//! [`LoopProgressNotifier`] is an **output port** that the presentation layer
//! implements to display what a run is doing while it happens.
//!
//! All methods have default no-op implementations, so implementers only
//! need to override the callbacks they care about.

use std::time::Duration;
use toolloop_domain::{LoopPhase, ToolCallRequest, ToolResult};

/// Progress notifier for agent loop runs.
pub trait LoopProgressNotifier: Send + Sync {
    /// Called when the loop transitions to a new phase
    fn on_phase_change(&self, _phase: LoopPhase) {}

    /// Called before each logical model invocation (1-based)
    fn on_model_invocation(&self, _invocation: usize, _max_invocations: usize) {}

    /// Called before sleeping ahead of a retry of an unavailable backend
    fn on_model_retry(&self, _attempt: u32, _max_retries: u32, _delay: Duration, _error: &str) {}

    /// Called when a tool call is dispatched
    fn on_tool_call(&self, _request: &ToolCallRequest) {}

    /// Called when a tool call returns (success or error result)
    fn on_tool_result(&self, _result: &ToolResult) {}

    /// Called once with the final answer
    fn on_answer(&self, _answer: &str) {}
}

/// No-op progress notifier
pub struct NoLoopProgress;

impl LoopProgressNotifier for NoLoopProgress {}
