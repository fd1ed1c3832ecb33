//! Domain layer for toolloop
//!
//! This crate contains the core types of the agent loop: tools, their calls
//! and results, conversations, and parsed model responses.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! A tool is a named, schema-described capability the model may invoke.
//! Every call carries a backend-assigned id and produces exactly one result
//! with the same id.
//!
//! ## Conversation
//!
//! The append-only record of one run: the user query, model text, tool-call
//! batches and their result batches.

pub mod agent;
pub mod conversation;
pub mod core;
pub mod tool;

// Re-export commonly used types
pub use agent::phase::{LoopPhase, PhaseTransitionError};
pub use conversation::{
    entities::{Conversation, ConversationTurn},
    response::{ContentBlock, ModelResponse, ResponseParseError, StopReason},
};
pub use core::query::Query;
pub use tool::{
    batch::{CorrelationError, correlate, ensure_unique_ids},
    entities::{ParamType, ToolArguments, ToolCallRequest, ToolDefinition, ToolParameter, ToolSchema},
    handler::{FnToolHandler, ToolHandler, ToolHandlerError, tool_fn},
    traits::{ArgumentError, DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolErrorKind, ToolPayload, ToolResult, ToolStatus},
};
