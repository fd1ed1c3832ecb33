//! Bedrock configuration from TOML (`[bedrock]` section)

use serde::{Deserialize, Serialize};

/// Default Bedrock model
pub const DEFAULT_BEDROCK_MODEL: &str = "anthropic.claude-3-sonnet-20240229-v1:0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBedrockConfig {
    /// AWS region for Bedrock models (default: "us-east-1")
    pub region: String,
    /// AWS profile name for credentials (default: environment chain)
    pub profile: Option<String>,
    /// Bedrock model id
    pub model_id: String,
    /// Max tokens per response (default: 1000)
    pub max_tokens: u32,
    /// Sampling temperature (default: 0)
    pub temperature: f32,
}

impl Default for FileBedrockConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            profile: None,
            model_id: DEFAULT_BEDROCK_MODEL.to_string(),
            max_tokens: 1000,
            temperature: 0.0,
        }
    }
}
