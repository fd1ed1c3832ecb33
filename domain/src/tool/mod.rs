//! Tool domain module
//!
//! Defines what a tool *is* from the agent loop's point of view, without any
//! I/O.
//!
//! ```text
//! ┌────────────────┐    ┌─────────────────┐    ┌──────────────┐
//! │ ToolDefinition │───▶│ ToolCallRequest │───▶│ ToolResult   │
//! │ (advertised)   │    │ (from the model)│    │ (same id)    │
//! └────────────────┘    └─────────────────┘    └──────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolDefinition`]: name, description and typed parameters (the input schema)
//! - [`ToolCallRequest`]: an invocation requested by the model, carrying a correlation id
//! - [`ToolResult`]: success output or a classified [`ToolError`]
//! - [`ToolValidator`]: pure argument validation against a definition
//! - [`ToolHandler`]: the executable half of a tool, supplied by infrastructure
//! - [`correlate`]: re-association of a result batch with its requests by id
//!
//! # Architecture
//!
//! - **Domain** (this module): definitions, validation, correlation
//! - **Application** (`ToolServerPort`): port for describing and executing tools
//! - **Infrastructure** (`ToolRegistry`, `ToolServer`): registration, dispatch,
//!   timeouts and concurrent batches

pub mod batch;
pub mod entities;
pub mod handler;
pub mod traits;
pub mod value_objects;

pub use batch::{CorrelationError, correlate, ensure_unique_ids};
pub use entities::{ParamType, ToolArguments, ToolCallRequest, ToolDefinition, ToolParameter, ToolSchema};
pub use handler::{FnToolHandler, ToolHandler, ToolHandlerError, tool_fn};
pub use traits::{ArgumentError, DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolErrorKind, ToolPayload, ToolResult, ToolStatus};
