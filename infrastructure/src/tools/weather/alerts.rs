//! get_alerts tool: active NWS alerts for a US state

use super::client::{NwsClient, field_or};
use async_trait::async_trait;
use toolloop_domain::tool::{
    entities::{ToolArguments, ToolDefinition, ToolParameter},
    handler::{ToolHandler, ToolHandlerError},
};
use tracing::info;

/// Tool name constant
pub const GET_ALERTS: &str = "get_alerts";

/// Returned when the state has no active alerts
pub const NO_ACTIVE_ALERTS: &str = "No active alerts for this state.";

/// Get the tool definition for get_alerts
pub fn get_alerts_definition() -> ToolDefinition {
    ToolDefinition::new(GET_ALERTS, "Get weather alerts for a US state.").with_parameter(
        ToolParameter::new("state", "Two-letter US state code (e.g. CA, NY)", true),
    )
}

/// Handler for get_alerts
pub struct GetAlerts {
    client: NwsClient,
}

impl GetAlerts {
    pub fn new(client: NwsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for GetAlerts {
    async fn invoke(
        &self,
        arguments: &ToolArguments,
    ) -> Result<serde_json::Value, ToolHandlerError> {
        let state = arguments
            .get("state")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_uppercase())
            .ok_or_else(|| ToolHandlerError::failed("Missing state"))?;
        if !is_state_code(&state) {
            return Err(ToolHandlerError::failed(format!(
                "Invalid state code '{}': expected two letters",
                state
            )));
        }

        info!(state = %state, "Fetching alerts");
        let data = self
            .client
            .get_json(&self.client.url(&format!("alerts/active/area/{}", state)))
            .await?;

        format_alerts(&data).map(serde_json::Value::String)
    }
}

fn is_state_code(state: &str) -> bool {
    state.len() == 2 && state.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Format one alert feature into a readable block
pub fn format_alert(feature: &serde_json::Value) -> String {
    let props = &feature["properties"];
    format!(
        "\nEvent: {}\nArea: {}\nSeverity: {}\nDescription: {}\nInstructions: {}\n",
        field_or(props, "event", "Unknown"),
        field_or(props, "areaDesc", "Unknown"),
        field_or(props, "severity", "Unknown"),
        field_or(props, "description", "No description available"),
        field_or(props, "instruction", "No specific instructions provided"),
    )
}

/// Format an alerts response (a GeoJSON feature collection)
pub fn format_alerts(data: &serde_json::Value) -> Result<String, ToolHandlerError> {
    let features = data
        .get("features")
        .and_then(|f| f.as_array())
        .ok_or_else(|| ToolHandlerError::failed("Unable to fetch alerts or no alerts found."))?;

    if features.is_empty() {
        return Ok(NO_ACTIVE_ALERTS.to_string());
    }

    info!(count = features.len(), "Found alerts");
    Ok(features
        .iter()
        .map(format_alert)
        .collect::<Vec<_>>()
        .join("\n---\n"))
}
