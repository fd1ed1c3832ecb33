//! Tool Registry
//!
//! The [`ToolRegistry`] maps tool names to their definitions and handlers.
//! It validates arguments before dispatch and wraps every handler failure,
//! so callers always get a classified [`RegistryError`].
//!
//! # Usage
//!
//! ```ignore
//! use toolloop_domain::{ToolDefinition, ToolParameter, tool_fn};
//! use toolloop_infrastructure::tools::ToolRegistry;
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(
//!     ToolDefinition::new("echo", "Echo the input")
//!         .with_parameter(ToolParameter::new("text", "Text to echo", true)),
//!     tool_fn(|args| async move { Ok(args["text"].clone()) }),
//! )?;
//!
//! let output = registry.invoke("echo", &args).await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use toolloop_domain::tool::{
    entities::{ToolArguments, ToolDefinition},
    handler::{ToolHandler, ToolHandlerError},
    traits::{ArgumentError, DefaultToolValidator, ToolValidator},
    value_objects::ToolError,
};

/// Errors raised by the registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for '{tool}': {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: ArgumentError,
    },

    #[error("Tool '{tool}' failed: {source}")]
    ToolExecution {
        tool: String,
        #[source]
        source: ToolHandlerError,
    },
}

impl RegistryError {
    /// Offending field, for argument errors
    pub fn field(&self) -> Option<&str> {
        match self {
            RegistryError::InvalidArguments { source, .. } => Some(source.field()),
            _ => None,
        }
    }

    /// Convert into the error record carried by a tool result
    pub fn to_tool_error(&self) -> ToolError {
        match self {
            RegistryError::UnknownTool(name) => ToolError::unknown_tool(name),
            RegistryError::InvalidArguments { .. } => ToolError::invalid_arguments(self.to_string()),
            RegistryError::ToolExecution { source, .. } => {
                ToolError::execution_failed(source.to_string())
            }
            RegistryError::DuplicateTool(_) => ToolError::execution_failed(self.to_string()),
        }
    }
}

/// Name-keyed registry of tools
///
/// Definitions are kept in registration order for advertisement.
#[derive(Default)]
pub struct ToolRegistry {
    definitions: Vec<ToolDefinition>,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
    validator: DefaultToolValidator,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    ///
    /// Fails with [`RegistryError::DuplicateTool`] if the name is taken.
    pub fn register<H: ToolHandler + 'static>(
        &mut self,
        definition: ToolDefinition,
        handler: H,
    ) -> Result<(), RegistryError> {
        self.register_arc(definition, Arc::new(handler))
    }

    /// Register a tool (Arc version)
    pub fn register_arc(
        &mut self,
        definition: ToolDefinition,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), RegistryError> {
        if self.handlers.contains_key(&definition.name) {
            return Err(RegistryError::DuplicateTool(definition.name));
        }

        tracing::debug!(
            tool = %definition.name,
            parameters = definition.parameters.len(),
            "Registered tool"
        );
        self.handlers.insert(definition.name.clone(), handler);
        self.definitions.push(definition);
        Ok(())
    }

    /// All definitions, in registration order
    pub fn list_definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Validate the arguments and call the tool's handler
    pub async fn invoke(
        &self,
        name: &str,
        arguments: &ToolArguments,
    ) -> Result<serde_json::Value, RegistryError> {
        let (definition, handler) = match (self.get(name), self.handlers.get(name)) {
            (Some(definition), Some(handler)) => (definition, handler),
            _ => return Err(RegistryError::UnknownTool(name.to_string())),
        };

        self.validator
            .validate(arguments, definition)
            .map_err(|source| RegistryError::InvalidArguments {
                tool: name.to_string(),
                source,
            })?;

        handler
            .invoke(arguments)
            .await
            .map_err(|source| RegistryError::ToolExecution {
                tool: name.to_string(),
                source,
            })
    }
}
