//! Configuration file loading for toolloop
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TOOLLOOP_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./toolloop.toml` or `./.toolloop.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/toolloop/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_BEDROCK_MODEL, DEFAULT_BIND, FileAgentConfig,
    FileBedrockConfig, FileConfig, FileLoggingConfig, FileRetryConfig, FileServerConfig,
    FileToolsConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
