//! Model response types.
//!
//! A backend returns a list of content blocks and a stop reason. The agent
//! loop only ever sees the parsed form, [`ModelResponse`]: either a final
//! answer or a batch of tool calls.
//!
//! ```text
//! backend → (Vec<ContentBlock>, StopReason) → ModelResponse::from_content()
//!                                                ├─ FinalAnswer { text }
//!                                                └─ ToolCalls { requests }
//! ```

use crate::tool::entities::{ToolArguments, ToolCallRequest};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Note appended when the backend stopped at its token limit.
pub const MAX_TOKENS_NOTE: &str = "[Max tokens reached, ending conversation.]";

/// Note returned when the backend filtered its own output.
pub const CONTENT_FILTERED_NOTE: &str = "[Content filtered, ending conversation.]";

/// A single block of content within a backend response.
///
/// # Examples
///
/// ```
/// use toolloop_domain::conversation::response::ContentBlock;
///
/// let text = ContentBlock::text("Checking the forecast.");
/// assert_eq!(text.as_text(), Some("Checking the forecast."));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },

    /// A tool use request.
    ToolUse {
        /// Backend-assigned id for correlating with tool results
        id: String,
        name: String,
        input: ToolArguments,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response
    EndTurn,
    /// The model wants tools executed
    ToolUse,
    /// Hit the token limit; text may be truncated
    MaxTokens,
    /// A configured stop sequence was produced
    StopSequence,
    /// The backend's guardrails filtered the output
    ContentFiltered,
    /// Anything the backend reports that we do not understand
    Other(String),
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::EndTurn => write!(f, "end_turn"),
            StopReason::ToolUse => write!(f, "tool_use"),
            StopReason::MaxTokens => write!(f, "max_tokens"),
            StopReason::StopSequence => write!(f, "stop_sequence"),
            StopReason::ContentFiltered => write!(f, "content_filtered"),
            StopReason::Other(other) => write!(f, "{}", other),
        }
    }
}

/// A backend response that cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseParseError {
    #[error("stop reason is tool_use but the response has no tool use blocks")]
    NoToolCalls,

    #[error("tool use block has an empty id")]
    EmptyToolId,

    #[error("tool use block '{id}' has an empty tool name")]
    EmptyToolName { id: String },

    #[error("tool use id '{0}' appears more than once")]
    DuplicateToolId(String),

    #[error("unsupported stop reason: {0}")]
    UnsupportedStopReason(String),
}

/// Parsed model output.
///
/// A response is never both: text emitted next to tool calls is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelResponse {
    FinalAnswer { text: String },
    ToolCalls { requests: Vec<ToolCallRequest> },
}

impl ModelResponse {
    pub fn final_answer(text: impl Into<String>) -> Self {
        ModelResponse::FinalAnswer { text: text.into() }
    }

    pub fn tool_calls(requests: Vec<ToolCallRequest>) -> Self {
        ModelResponse::ToolCalls { requests }
    }

    /// Interpret backend content blocks according to the stop reason.
    pub fn from_content(
        content: Vec<ContentBlock>,
        stop_reason: StopReason,
    ) -> Result<Self, ResponseParseError> {
        match stop_reason {
            StopReason::ToolUse => {
                let mut seen = HashSet::new();
                let mut requests = Vec::new();
                for block in content {
                    if let ContentBlock::ToolUse { id, name, input } = block {
                        if id.is_empty() {
                            return Err(ResponseParseError::EmptyToolId);
                        }
                        if name.is_empty() {
                            return Err(ResponseParseError::EmptyToolName { id });
                        }
                        if !seen.insert(id.clone()) {
                            return Err(ResponseParseError::DuplicateToolId(id));
                        }
                        requests.push(ToolCallRequest::new(id, name).with_arguments(input));
                    }
                }
                if requests.is_empty() {
                    return Err(ResponseParseError::NoToolCalls);
                }
                Ok(ModelResponse::ToolCalls { requests })
            }
            StopReason::EndTurn | StopReason::StopSequence => {
                Ok(ModelResponse::final_answer(text_of(&content)))
            }
            StopReason::MaxTokens => {
                let text = text_of(&content);
                let text = if text.is_empty() {
                    MAX_TOKENS_NOTE.to_string()
                } else {
                    format!("{}\n{}", text, MAX_TOKENS_NOTE)
                };
                Ok(ModelResponse::final_answer(text))
            }
            StopReason::ContentFiltered => Ok(ModelResponse::final_answer(CONTENT_FILTERED_NOTE)),
            StopReason::Other(other) => Err(ResponseParseError::UnsupportedStopReason(other)),
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ModelResponse::FinalAnswer { .. })
    }
}

fn text_of(content: &[ContentBlock]) -> String {
    content
        .iter()
        .filter_map(|b| b.as_text())
        .collect::<Vec<_>>()
        .join("")
}
