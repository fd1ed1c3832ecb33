//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod model_gateway;
pub mod progress;
pub mod tool_schema;
pub mod tool_server;
