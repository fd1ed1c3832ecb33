//! Application layer for toolloop
//!
//! This crate contains the agent loop use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{LoopParams, RetryPolicy};
pub use ports::{
    model_gateway::{GatewayError, ModelGateway},
    progress::{LoopProgressNotifier, NoLoopProgress},
    tool_schema::ToolSchemaPort,
    tool_server::{ToolServerError, ToolServerPort},
};
pub use use_cases::agent_loop::{AgentLoop, AgentLoopError, AgentLoopOutput, FailureKind};
