//! Infrastructure layer for toolloop
//!
//! This crate contains adapters that implement the application layer ports:
//!
//! - [`tools`]: tool registry, tool server and the concrete tools
//! - [`providers`]: model backends (`bedrock` feature)
//! - [`config`]: TOML/environment configuration loading

pub mod config;
pub mod providers;
pub mod tools;

pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
#[cfg(feature = "bedrock")]
pub use providers::bedrock::BedrockGateway;
pub use tools::{
    JsonSchemaToolConverter, RegistryError, ToolRegistry, ToolServer, ToolSetupError,
    default_registry,
};
