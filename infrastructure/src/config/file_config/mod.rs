//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is optional; missing keys fall back to defaults.

mod agent;
mod bedrock;
mod server;
mod tools;

pub use agent::{FileAgentConfig, FileRetryConfig};
pub use bedrock::{DEFAULT_BEDROCK_MODEL, FileBedrockConfig};
pub use server::{DEFAULT_BIND, FileLoggingConfig, FileServerConfig};
pub use tools::FileToolsConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("agent.max_model_invocations cannot be 0")]
    ZeroInvocationCap,

    #[error("agent.retry.backoff_multiplier must be positive (got {0})")]
    InvalidBackoffMultiplier(f64),

    #[error("tools.call_timeout_secs cannot be 0")]
    ZeroToolTimeout,

    #[error("bedrock.model_id cannot be empty")]
    EmptyModelId,

    #[error("bedrock.max_tokens cannot be 0")]
    ZeroMaxTokens,

    #[error("server.bind cannot be empty")]
    EmptyBindAddress,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Agent loop settings
    pub agent: FileAgentConfig,
    /// Bedrock model backend settings
    pub bedrock: FileBedrockConfig,
    /// Tools settings
    pub tools: FileToolsConfig,
    /// HTTP entry adapter settings
    pub server: FileServerConfig,
    /// Logging settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.agent.max_model_invocations == 0 {
            issues.push(ConfigValidationError::ZeroInvocationCap);
        }
        let multiplier = self.agent.retry.backoff_multiplier;
        if !(multiplier.is_finite() && multiplier > 0.0) {
            issues.push(ConfigValidationError::InvalidBackoffMultiplier(multiplier));
        }
        if self.tools.call_timeout_secs == 0 {
            issues.push(ConfigValidationError::ZeroToolTimeout);
        }
        if self.bedrock.model_id.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelId);
        }
        if self.bedrock.max_tokens == 0 {
            issues.push(ConfigValidationError::ZeroMaxTokens);
        }
        if self.server.bind.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyBindAddress);
        }

        issues
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
