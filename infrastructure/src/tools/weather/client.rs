//! Minimal client for the US National Weather Service API

use std::time::Duration;
use toolloop_domain::tool::handler::ToolHandlerError;
use tracing::debug;

/// Base URL of the NWS API
pub const NWS_API_BASE: &str = "https://api.weather.gov";

/// Default User-Agent sent with every request (NWS rejects anonymous clients)
pub const DEFAULT_USER_AGENT: &str = "weather-app/1.0";

/// HTTP client for NWS GeoJSON endpoints
#[derive(Debug, Clone)]
pub struct NwsClient {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl NwsClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: NWS_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET a URL and decode its JSON body
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, ToolHandlerError> {
        debug!(url, "NWS request");
        let response = self
            .http
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/geo+json")
            .send()
            .await
            .map_err(|e| ToolHandlerError::failed(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolHandlerError::Upstream {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ToolHandlerError::failed(format!("Invalid JSON from {}: {}", url, e)))
    }
}

/// Render a JSON field for display, falling back when absent or null.
pub(super) fn field_or<'a>(value: &'a serde_json::Value, key: &str, fallback: &'a str) -> std::borrow::Cow<'a, str> {
    match value.get(key) {
        Some(serde_json::Value::String(s)) => std::borrow::Cow::Borrowed(s.as_str()),
        Some(serde_json::Value::Null) | None => std::borrow::Cow::Borrowed(fallback),
        Some(other) => std::borrow::Cow::Owned(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_building() {
        let client = NwsClient::new(Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://localhost:8080/");

        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.url("/alerts/active/area/CA"),
            "http://localhost:8080/alerts/active/area/CA"
        );
    }

    #[test]
    fn test_field_or() {
        let props = json!({"event": "Flood Warning", "temperature": 72, "instruction": null});

        assert_eq!(field_or(&props, "event", "Unknown"), "Flood Warning");
        assert_eq!(field_or(&props, "temperature", "?"), "72");
        assert_eq!(field_or(&props, "instruction", "None given"), "None given");
        assert_eq!(field_or(&props, "missing", "Unknown"), "Unknown");
    }
}
