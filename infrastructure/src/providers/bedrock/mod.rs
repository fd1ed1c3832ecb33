//! AWS Bedrock Converse API provider
//!
//! Provides access to Claude models via AWS IAM authentication
//! through the Bedrock Converse API.

mod gateway;
mod types;

pub use gateway::BedrockGateway;
