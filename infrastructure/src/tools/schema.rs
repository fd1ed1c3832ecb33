//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] that produces provider-neutral
//! JSON Schema for advertising tools to a model backend.

use toolloop_application::ports::tool_schema::ToolSchemaPort;
use toolloop_domain::tool::entities::{ToolDefinition, ToolSchema};

/// Default implementation producing provider-neutral JSON Schema.
///
/// Each parameter becomes a property typed by its
/// [`ParamType`](toolloop_domain::ParamType); required parameters are listed
/// under `"required"` in declaration order.
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> ToolSchema {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let mut prop = serde_json::Map::new();
            prop.insert(
                "type".to_string(),
                serde_json::json!(param.param_type.as_str()),
            );
            prop.insert(
                "description".to_string(),
                serde_json::json!(param.description),
            );
            properties.insert(param.name.clone(), serde_json::Value::Object(prop));

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        ToolSchema {
            name: tool.name.clone(),
            description: tool.description.clone(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        }
    }
}
