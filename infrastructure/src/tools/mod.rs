//! Tool server and concrete tools
//!
//! - [`ToolRegistry`]: name-keyed definitions and handlers with argument validation
//! - [`ToolServer`]: [`ToolServerPort`](toolloop_application::ToolServerPort)
//!   implementation with per-call timeouts and concurrent batches
//! - [`JsonSchemaToolConverter`]: JSON Schema advertisement of definitions
//!
//! ## Tools (`web-tools` feature)
//!
//! | Tool | Module |
//! |------|--------|
//! | `get_alerts` | [`weather`] |
//! | `get_forecast` | [`weather`] |
//! | `visit_webpage` | [`web`] |

mod registry;
mod schema;
mod server;

#[cfg(feature = "web-tools")]
pub mod weather;
#[cfg(feature = "web-tools")]
pub mod web;

pub use registry::{RegistryError, ToolRegistry};
pub use schema::JsonSchemaToolConverter;
pub use server::{DEFAULT_CALL_TIMEOUT, ToolServer};

use crate::config::FileToolsConfig;
use thiserror::Error;

/// Errors raised while assembling the default tool set
#[derive(Debug, Error)]
pub enum ToolSetupError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Build a registry with every available tool that `config` enables
#[cfg_attr(not(feature = "web-tools"), allow(unused_variables))]
pub fn default_registry(config: &FileToolsConfig) -> Result<ToolRegistry, ToolSetupError> {
    #[cfg_attr(not(feature = "web-tools"), allow(unused_mut))]
    let mut registry = ToolRegistry::new();

    #[cfg(feature = "web-tools")]
    {
        let timeout = std::time::Duration::from_secs(config.call_timeout_secs);
        let nws = weather::NwsClient::new(timeout)
            .map_err(|e| ToolSetupError::HttpClient(e.to_string()))?
            .with_user_agent(config.user_agent.clone());

        if config.is_enabled(weather::GET_ALERTS) {
            registry.register(weather::get_alerts_definition(), weather::GetAlerts::new(nws.clone()))?;
        }
        if config.is_enabled(weather::GET_FORECAST) {
            registry.register(weather::get_forecast_definition(), weather::GetForecast::new(nws))?;
        }
        if config.is_enabled(web::VISIT_WEBPAGE) {
            let visit = web::VisitWebpage::new(timeout, config.user_agent.clone())
                .map_err(|e| ToolSetupError::HttpClient(e.to_string()))?;
            registry.register(web::visit_webpage_definition(), visit)?;
        }
    }

    tracing::info!(tools = ?registry.names(), "Tool registry ready");
    Ok(registry)
}

#[cfg(all(test, feature = "web-tools"))]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_registers_all_tools() {
        let registry = default_registry(&FileToolsConfig::default()).unwrap();
        assert_eq!(
            registry.names(),
            vec![weather::GET_ALERTS, weather::GET_FORECAST, web::VISIT_WEBPAGE]
        );
    }

    #[test]
    fn test_default_registry_honors_enabled_list() {
        let config = FileToolsConfig {
            enabled: vec![web::VISIT_WEBPAGE.to_string()],
            ..Default::default()
        };
        let registry = default_registry(&config).unwrap();
        assert_eq!(registry.names(), vec![web::VISIT_WEBPAGE]);
    }
}
