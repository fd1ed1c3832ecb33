//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain [`ToolDefinition`]) from "how they
//! are described to a model" (JSON Schema, built in infrastructure).

use toolloop_domain::{ToolDefinition, ToolSchema};

/// Port for converting tool definitions to their advertised schema form.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to a provider-neutral schema.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> ToolSchema;

    /// Convert all tools, keeping their order.
    fn all_tools_schema(&self, tools: &[ToolDefinition]) -> Vec<ToolSchema> {
        tools.iter().map(|t| self.tool_to_schema(t)).collect()
    }
}
