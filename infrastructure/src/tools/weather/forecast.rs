//! get_forecast tool: NWS forecast for a latitude/longitude

use super::client::{NwsClient, field_or};
use async_trait::async_trait;
use toolloop_domain::tool::{
    entities::{ParamType, ToolArguments, ToolDefinition, ToolParameter},
    handler::{ToolHandler, ToolHandlerError},
};
use tracing::info;

/// Tool name constant
pub const GET_FORECAST: &str = "get_forecast";

/// Number of forecast periods included in the answer
pub const FORECAST_PERIODS: usize = 5;

/// Get the tool definition for get_forecast
pub fn get_forecast_definition() -> ToolDefinition {
    ToolDefinition::new(GET_FORECAST, "Get weather forecast for a location.")
        .with_parameter(
            ToolParameter::new("latitude", "Latitude of the location", true)
                .with_type(ParamType::Number),
        )
        .with_parameter(
            ToolParameter::new("longitude", "Longitude of the location", true)
                .with_type(ParamType::Number),
        )
}

/// Handler for get_forecast
pub struct GetForecast {
    client: NwsClient,
}

impl GetForecast {
    pub fn new(client: NwsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for GetForecast {
    async fn invoke(
        &self,
        arguments: &ToolArguments,
    ) -> Result<serde_json::Value, ToolHandlerError> {
        let coordinate = |key: &str| {
            arguments
                .get(key)
                .and_then(|v| v.as_f64())
                .ok_or_else(|| ToolHandlerError::failed(format!("Missing {}", key)))
        };
        let latitude = coordinate("latitude")?;
        let longitude = coordinate("longitude")?;

        info!(latitude, longitude, "Fetching forecast");
        let points = self
            .client
            .get_json(&self.client.url(&format!("points/{},{}", latitude, longitude)))
            .await?;

        let forecast_url = points["properties"]["forecast"].as_str().ok_or_else(|| {
            ToolHandlerError::failed("Unable to fetch forecast data for this location.")
        })?;

        let forecast = self.client.get_json(forecast_url).await?;
        format_forecast(&forecast).map(serde_json::Value::String)
    }
}

/// Format one forecast period
pub fn format_period(period: &serde_json::Value) -> String {
    format!(
        "\n{}:\nTemperature: {}°{}\nWind: {} {}\nForecast: {}\n",
        field_or(period, "name", "Unknown"),
        field_or(period, "temperature", "?"),
        field_or(period, "temperatureUnit", ""),
        field_or(period, "windSpeed", "?"),
        field_or(period, "windDirection", ""),
        field_or(period, "detailedForecast", "No forecast available"),
    )
}

/// Format the first periods of a gridpoint forecast response
pub fn format_forecast(data: &serde_json::Value) -> Result<String, ToolHandlerError> {
    let periods = data["properties"]["periods"]
        .as_array()
        .ok_or_else(|| ToolHandlerError::failed("Unable to fetch detailed forecast."))?;

    let forecasts: Vec<String> = periods
        .iter()
        .take(FORECAST_PERIODS)
        .map(format_period)
        .collect();

    info!(count = forecasts.len(), "Found forecast periods");
    Ok(forecasts.join("\n---\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn period(name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "temperature": 68,
            "temperatureUnit": "F",
            "windSpeed": "10 mph",
            "windDirection": "SW",
            "detailedForecast": "Partly cloudy."
        })
    }

    #[test]
    fn test_format_period() {
        assert_eq!(
            format_period(&period("Tonight")),
            "\nTonight:\nTemperature: 68°F\nWind: 10 mph SW\nForecast: Partly cloudy.\n"
        );
    }

    #[test]
    fn test_format_forecast_limits_periods() {
        let names = ["Today", "Tonight", "Monday", "Monday Night", "Tuesday", "Tuesday Night", "Wednesday"];
        let data = json!({
            "properties": {
                "periods": names.iter().map(|n| period(n)).collect::<Vec<_>>()
            }
        });

        let text = format_forecast(&data).unwrap();
        assert_eq!(text.matches("\n---\n").count(), FORECAST_PERIODS - 1);
        assert!(text.contains("Tuesday:"));
        assert!(!text.contains("Tuesday Night"));
    }

    #[test]
    fn test_format_forecast_malformed() {
        assert!(format_forecast(&json!({"properties": {}})).is_err());
    }

    #[test]
    fn test_definition_types() {
        let definition = get_forecast_definition();
        assert_eq!(
            definition.parameter("latitude").map(|p| p.param_type),
            Some(ParamType::Number)
        );
    }
}
