//! HTTP server and logging configuration (`[server]`, `[logging]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default bind address for the HTTP entry adapter
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Address the HTTP adapter listens on
    pub bind: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Append log output to this file in addition to stderr
    pub file: Option<PathBuf>,
}
