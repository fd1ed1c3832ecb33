//! Bedrock model gateway
//!
//! Implements [`ModelGateway`] over the stateless Converse API: every
//! invocation sends the full conversation, the preamble as the system
//! block and the advertised tools as the tool configuration.

use super::types;
use crate::config::FileBedrockConfig;
use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::types as bedrock;
use toolloop_application::ports::model_gateway::{GatewayError, ModelGateway};
use toolloop_domain::{Conversation, ModelResponse, ToolSchema};
use tracing::{debug, info};

pub struct BedrockGateway {
    client: BedrockClient,
    model_id: String,
    max_tokens: i32,
    temperature: f32,
}

impl BedrockGateway {
    /// Create a gateway, loading AWS credentials from the environment
    /// (or the configured profile).
    pub async fn new(config: &FileBedrockConfig) -> Self {
        let mut aws_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(ref profile) = config.profile {
            aws_config_loader = aws_config_loader.profile_name(profile);
        }

        let aws_config = aws_config_loader.load().await;
        info!(region = %config.region, model = %config.model_id, "Bedrock gateway initialized");

        Self::from_client(BedrockClient::new(&aws_config), config)
    }

    /// Create a gateway around an existing client
    pub fn from_client(client: BedrockClient, config: &FileBedrockConfig) -> Self {
        Self {
            client,
            model_id: config.model_id.clone(),
            max_tokens: i32::try_from(config.max_tokens).unwrap_or(i32::MAX),
            temperature: config.temperature,
        }
    }

    fn inference_config(&self) -> bedrock::InferenceConfiguration {
        bedrock::InferenceConfiguration::builder()
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
    }
}

#[async_trait]
impl ModelGateway for BedrockGateway {
    async fn invoke(
        &self,
        conversation: &Conversation,
        tools: &[ToolSchema],
    ) -> Result<ModelResponse, GatewayError> {
        let messages = types::convert_conversation(conversation)?;

        let mut request = self
            .client
            .converse()
            .model_id(&self.model_id)
            .set_messages(Some(messages))
            .inference_config(self.inference_config());

        if !conversation.preamble().is_empty() {
            request = request.system(bedrock::SystemContentBlock::Text(
                conversation.preamble().to_string(),
            ));
        }
        if let Some(tool_config) = types::convert_tool_config(tools)? {
            request = request.tool_config(tool_config);
        }

        debug!(
            model = %self.model_id,
            turns = conversation.len(),
            tools = tools.len(),
            "Calling Bedrock Converse API"
        );

        let response = request
            .send()
            .await
            .map_err(|e| types::convert_converse_error(&e))?;

        let output = response.output().ok_or_else(|| {
            GatewayError::ResponseParse("No output in Bedrock response".to_string())
        })?;

        types::convert_converse_output(output, response.stop_reason())
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> BedrockClient {
        let config = aws_sdk_bedrockruntime::Config::builder()
            .behavior_version(aws_sdk_bedrockruntime::config::BehaviorVersion::latest())
            .region(aws_sdk_bedrockruntime::config::Region::new("us-east-1"))
            .build();
        BedrockClient::from_conf(config)
    }

    #[test]
    fn test_from_client_uses_config() {
        let config = FileBedrockConfig {
            max_tokens: 2048,
            temperature: 0.5,
            ..Default::default()
        };
        let gateway = BedrockGateway::from_client(offline_client(), &config);

        assert_eq!(gateway.model_id(), config.model_id);
        let inference = gateway.inference_config();
        assert_eq!(inference.max_tokens(), Some(2048));
        assert_eq!(inference.temperature(), Some(0.5));
    }
}
