//! Tools configuration from TOML (`[tools]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [tools]
//! call_timeout_secs = 30
//! user_agent = "weather-app/1.0"
//! enabled = ["get_alerts", "get_forecast"]   # empty = all available tools
//! ```

use serde::{Deserialize, Serialize};

/// Raw tools configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Per-call timeout in seconds
    pub call_timeout_secs: u64,
    /// User-Agent sent by HTTP-backed tools
    pub user_agent: String,
    /// Tool names to register. Empty registers every available tool.
    pub enabled: Vec<String>,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: 30,
            user_agent: "weather-app/1.0".to_string(),
            enabled: Vec::new(),
        }
    }
}

impl FileToolsConfig {
    /// Check if a tool should be registered
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.is_empty() || self.enabled.iter().any(|n| n == name)
    }
}
