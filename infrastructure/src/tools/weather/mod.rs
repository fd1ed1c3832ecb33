//! **Weather Tools**: `get_alerts` and `get_forecast`
//!
//! Backed by the US National Weather Service API (`api.weather.gov`),
//! gated behind the `web-tools` Cargo feature flag.
//!
//! | Tool | Description |
//! |------|-------------|
//! | `get_alerts` | Active alerts for a two-letter state code |
//! | `get_forecast` | Next five forecast periods for a latitude/longitude |

mod alerts;
mod client;
mod forecast;

pub use alerts::{GET_ALERTS, GetAlerts, format_alerts, get_alerts_definition};
pub use client::{DEFAULT_USER_AGENT, NWS_API_BASE, NwsClient};
pub use forecast::{GET_FORECAST, GetForecast, format_forecast, get_forecast_definition};
