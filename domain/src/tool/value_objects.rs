//! Tool domain value objects: immutable result and error types
//!
//! These types form the **output side** of a tool call. Every
//! [`ToolCallRequest`](super::ToolCallRequest) produces exactly one
//! [`ToolResult`] carrying the same id, whether the tool succeeded or not.
//! Failures are data, not exceptions: the model sees the error kind and
//! message and can decide how to recover.

use serde::{Deserialize, Serialize};

/// Classification of a tool failure.
///
/// | Kind | Cause |
/// |------|-------|
/// | `UNKNOWN_TOOL` | The model named a tool that is not registered |
/// | `INVALID_ARGUMENTS` | Missing, unknown or mistyped argument |
/// | `EXECUTION_FAILED` | The handler itself failed (I/O error, HTTP error) |
/// | `TIMEOUT` | The handler exceeded the per-call timeout |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolErrorKind {
    UnknownTool,
    InvalidArguments,
    ExecutionFailed,
    Timeout,
}

impl ToolErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            ToolErrorKind::UnknownTool => "UNKNOWN_TOOL",
            ToolErrorKind::InvalidArguments => "INVALID_ARGUMENTS",
            ToolErrorKind::ExecutionFailed => "EXECUTION_FAILED",
            ToolErrorKind::Timeout => "TIMEOUT",
        }
    }
}

impl std::fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error payload of a failed tool call: `{kind, message}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::new(
            ToolErrorKind::UnknownTool,
            format!("Unknown tool: {}", name.into()),
        )
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::ExecutionFailed, message)
    }

    pub fn timeout(tool: impl Into<String>, after_ms: u64) -> Self {
        Self::new(
            ToolErrorKind::Timeout,
            format!("Tool {} timed out after {} ms", tool.into(), after_ms),
        )
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Outcome status of a tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
}

/// Payload of a tool result: the handler's JSON output, or the error record.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPayload {
    Error(ToolError),
    Output(serde_json::Value),
}

/// Result of one tool call, correlated to its request by `id`.
///
/// Serialized keyed on `status`: `{"status": "success", "output": ...}` or
/// `{"status": "error", "error": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ToolResultRecord", from = "ToolResultRecord")]
pub struct ToolResult {
    /// Id of the originating [`ToolCallRequest`](super::ToolCallRequest)
    pub id: String,
    /// Name of the tool that was called
    pub tool_name: String,
    pub status: ToolStatus,
    pub payload: ToolPayload,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum ToolResultRecord {
    Success {
        id: String,
        tool_name: String,
        output: serde_json::Value,
    },
    Error {
        id: String,
        tool_name: String,
        error: ToolError,
    },
}

impl From<ToolResult> for ToolResultRecord {
    fn from(result: ToolResult) -> Self {
        let ToolResult { id, tool_name, payload, .. } = result;
        match payload {
            ToolPayload::Output(output) => ToolResultRecord::Success { id, tool_name, output },
            ToolPayload::Error(error) => ToolResultRecord::Error { id, tool_name, error },
        }
    }
}

impl From<ToolResultRecord> for ToolResult {
    fn from(record: ToolResultRecord) -> Self {
        match record {
            ToolResultRecord::Success { id, tool_name, output } => {
                ToolResult::success(id, tool_name, output)
            }
            ToolResultRecord::Error { id, tool_name, error } => {
                ToolResult::failure(id, tool_name, error)
            }
        }
    }
}

impl ToolResult {
    /// Create a successful result
    pub fn success(
        id: impl Into<String>,
        tool_name: impl Into<String>,
        output: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            status: ToolStatus::Success,
            payload: ToolPayload::Output(output.into()),
        }
    }

    /// Create a failed result
    pub fn failure(id: impl Into<String>, tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            status: ToolStatus::Error,
            payload: ToolPayload::Error(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }

    /// Get the output value (successful results only)
    pub fn output(&self) -> Option<&serde_json::Value> {
        match &self.payload {
            ToolPayload::Output(value) => Some(value),
            ToolPayload::Error(_) => None,
        }
    }

    /// Get the error (failed results only)
    pub fn error(&self) -> Option<&ToolError> {
        match &self.payload {
            ToolPayload::Error(error) => Some(error),
            ToolPayload::Output(_) => None,
        }
    }

    /// JSON document handed back to the model for this result.
    ///
    /// Plain-string output is wrapped as `{"text": ...}`, other scalar or
    /// array output as `{"result": ...}`; objects pass through unchanged.
    /// Errors become `{"error": {"kind": ..., "message": ...}}`.
    pub fn to_model_content(&self) -> serde_json::Value {
        match &self.payload {
            ToolPayload::Output(serde_json::Value::String(text)) => {
                serde_json::json!({ "text": text })
            }
            ToolPayload::Output(value @ serde_json::Value::Object(_)) => value.clone(),
            ToolPayload::Output(value) => serde_json::json!({ "result": value }),
            ToolPayload::Error(error) => serde_json::json!({
                "error": { "kind": error.kind, "message": error.message }
            }),
        }
    }
}
