//! Agent loop phases

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Phase of a single agent loop run.
///
/// ```text
/// Start ──▶ AwaitingModel ──▶ Answered
///               ▲    │
///               │    ▼
///           ExecutingTools
///
/// any non-terminal phase ──▶ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopPhase {
    /// Conversation built, no model call yet
    Start,
    /// Waiting for the model backend (including retries)
    AwaitingModel,
    /// Running a batch of tool calls
    ExecutingTools,
    /// Terminated with a final answer
    Answered,
    /// Terminated with a failure
    Failed,
}

/// Attempted phase change that the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid loop transition from {from} to {to}")]
pub struct PhaseTransitionError {
    pub from: LoopPhase,
    pub to: LoopPhase,
}

impl LoopPhase {
    pub fn as_str(&self) -> &str {
        match self {
            LoopPhase::Start => "start",
            LoopPhase::AwaitingModel => "awaiting_model",
            LoopPhase::ExecutingTools => "executing_tools",
            LoopPhase::Answered => "answered",
            LoopPhase::Failed => "failed",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            LoopPhase::Start => "Start",
            LoopPhase::AwaitingModel => "Awaiting Model",
            LoopPhase::ExecutingTools => "Executing Tools",
            LoopPhase::Answered => "Answered",
            LoopPhase::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopPhase::Answered | LoopPhase::Failed)
    }

    pub fn can_transition_to(&self, next: LoopPhase) -> bool {
        use LoopPhase::*;
        matches!(
            (self, next),
            (Start, AwaitingModel)
                | (AwaitingModel, ExecutingTools)
                | (AwaitingModel, Answered)
                | (ExecutingTools, AwaitingModel)
                | (Start | AwaitingModel | ExecutingTools, Failed)
        )
    }

    /// Move to `next`, rejecting transitions the loop never makes.
    pub fn transition(self, next: LoopPhase) -> Result<LoopPhase, PhaseTransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(PhaseTransitionError {
                from: self,
                to: next,
            })
        }
    }
}

impl std::fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
