//! Tool domain traits
//!
//! Contains pure domain logic for validating call arguments against a
//! tool's declared parameters. The async execution side lives in
//! [`handler`](super::handler).

use super::entities::{ToolArguments, ToolDefinition};
use thiserror::Error;

/// Why a set of arguments does not match a tool's input schema.
///
/// Every variant names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("Missing required parameter '{field}'")]
    Missing { field: String },

    #[error("Unknown parameter '{field}'")]
    Unknown { field: String },

    #[error("Parameter '{field}' must be of type {expected}, got {actual}")]
    WrongType {
        field: String,
        expected: String,
        actual: String,
    },
}

impl ArgumentError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            ArgumentError::Missing { field }
            | ArgumentError::Unknown { field }
            | ArgumentError::WrongType { field, .. } => field,
        }
    }
}

/// Validator for tool call arguments
///
/// This is a pure domain trait that validates arguments against
/// a tool definition without any I/O operations.
pub trait ToolValidator {
    /// Validate arguments against a tool definition
    fn validate(
        &self,
        arguments: &ToolArguments,
        definition: &ToolDefinition,
    ) -> Result<(), ArgumentError>;
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(
        &self,
        arguments: &ToolArguments,
        definition: &ToolDefinition,
    ) -> Result<(), ArgumentError> {
        // Declaration order keeps the reported field deterministic
        for param in &definition.parameters {
            match arguments.get(&param.name) {
                None | Some(serde_json::Value::Null) if param.required => {
                    return Err(ArgumentError::Missing {
                        field: param.name.clone(),
                    });
                }
                None | Some(serde_json::Value::Null) => {}
                Some(value) if !param.param_type.accepts(value) => {
                    return Err(ArgumentError::WrongType {
                        field: param.name.clone(),
                        expected: param.param_type.to_string(),
                        actual: json_type_name(value).to_string(),
                    });
                }
                Some(_) => {}
            }
        }

        let mut unknown: Vec<&String> = arguments
            .keys()
            .filter(|name| definition.parameter(name).is_none())
            .collect();
        unknown.sort();
        if let Some(field) = unknown.first() {
            return Err(ArgumentError::Unknown {
                field: (*field).clone(),
            });
        }

        Ok(())
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(n) if n.is_f64() => "number",
        serde_json::Value::Number(_) => "integer",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
