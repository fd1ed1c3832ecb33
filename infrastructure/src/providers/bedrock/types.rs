//! Type conversions between AWS Bedrock SDK and domain types
//!
//! Converts domain conversations and tool schemas to Converse requests,
//! and Converse responses to domain [`ModelResponse`]s.

use aws_sdk_bedrockruntime::error::SdkError;
use aws_sdk_bedrockruntime::operation::converse::ConverseError;
use aws_sdk_bedrockruntime::types as bedrock;
use aws_smithy_types::Document;
use toolloop_application::ports::model_gateway::GatewayError;
use toolloop_domain::{
    ContentBlock, Conversation, ConversationTurn, ModelResponse, StopReason, ToolArguments,
    ToolCallRequest, ToolResult, ToolSchema,
};

// ─── Bedrock → Domain ────────────────────────────────────────────

/// Convert Bedrock stop reason to domain StopReason.
pub fn convert_stop_reason(reason: &bedrock::StopReason) -> StopReason {
    match reason {
        bedrock::StopReason::EndTurn => StopReason::EndTurn,
        bedrock::StopReason::ToolUse => StopReason::ToolUse,
        bedrock::StopReason::MaxTokens => StopReason::MaxTokens,
        bedrock::StopReason::StopSequence => StopReason::StopSequence,
        bedrock::StopReason::ContentFiltered => StopReason::ContentFiltered,
        other => StopReason::Other(other.as_str().to_string()),
    }
}

/// Convert a single Bedrock content block to a domain ContentBlock.
///
/// Returns `Ok(None)` for unsupported block types (Image, GuardContent, etc.)
/// and a parse error when a tool use input is not a JSON object.
pub fn convert_content_block(
    block: &bedrock::ContentBlock,
) -> Result<Option<ContentBlock>, GatewayError> {
    match block {
        bedrock::ContentBlock::Text(text) => Ok(Some(ContentBlock::text(text.clone()))),
        bedrock::ContentBlock::ToolUse(tool_use) => {
            let input: ToolArguments = match document_to_json(tool_use.input()) {
                serde_json::Value::Object(map) => map.into_iter().collect(),
                other => {
                    return Err(GatewayError::ResponseParse(format!(
                        "tool use '{}' input is not an object: {}",
                        tool_use.tool_use_id(),
                        other
                    )));
                }
            };
            Ok(Some(ContentBlock::ToolUse {
                id: tool_use.tool_use_id().to_string(),
                name: tool_use.name().to_string(),
                input,
            }))
        }
        _ => Ok(None),
    }
}

/// Interpret a Converse output according to its stop reason.
pub fn convert_converse_output(
    output: &bedrock::ConverseOutput,
    stop_reason: &bedrock::StopReason,
) -> Result<ModelResponse, GatewayError> {
    let content = match output {
        bedrock::ConverseOutput::Message(message) => message
            .content()
            .iter()
            .filter_map(|block| convert_content_block(block).transpose())
            .collect::<Result<Vec<_>, _>>()?,
        _ => {
            return Err(GatewayError::ResponseParse(
                "Bedrock response carried no message".to_string(),
            ));
        }
    };

    Ok(ModelResponse::from_content(content, convert_stop_reason(stop_reason))?)
}

// ─── Domain → Bedrock ────────────────────────────────────────────

fn build_error(what: &str, err: impl std::fmt::Display) -> GatewayError {
    GatewayError::BackendRejected(format!("Failed to build {}: {}", what, err))
}

fn message(
    role: bedrock::ConversationRole,
    content: Vec<bedrock::ContentBlock>,
) -> Result<bedrock::Message, GatewayError> {
    bedrock::Message::builder()
        .role(role)
        .set_content(Some(content))
        .build()
        .map_err(|e| build_error("message", e))
}

/// Convert a tool call to a Bedrock `toolUse` block.
pub fn convert_tool_call(request: &ToolCallRequest) -> Result<bedrock::ContentBlock, GatewayError> {
    let input = serde_json::Value::Object(
        request
            .arguments
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    );

    let block = bedrock::ToolUseBlock::builder()
        .tool_use_id(&request.id)
        .name(&request.tool_name)
        .input(json_to_document(&input))
        .build()
        .map_err(|e| build_error("tool use block", e))?;
    Ok(bedrock::ContentBlock::ToolUse(block))
}

/// Convert a tool result to a Bedrock `toolResult` block with JSON content.
pub fn convert_tool_result(result: &ToolResult) -> Result<bedrock::ContentBlock, GatewayError> {
    let status = if result.is_success() {
        bedrock::ToolResultStatus::Success
    } else {
        bedrock::ToolResultStatus::Error
    };

    let block = bedrock::ToolResultBlock::builder()
        .tool_use_id(&result.id)
        .status(status)
        .content(bedrock::ToolResultContentBlock::Json(json_to_document(
            &result.to_model_content(),
        )))
        .build()
        .map_err(|e| build_error("tool result block", e))?;
    Ok(bedrock::ContentBlock::ToolResult(block))
}

/// Convert the conversation turns to Converse messages.
///
/// Each turn becomes exactly one message: queries and tool results are
/// sent as the user, model text and tool calls as the assistant.
pub fn convert_conversation(
    conversation: &Conversation,
) -> Result<Vec<bedrock::Message>, GatewayError> {
    conversation
        .turns()
        .iter()
        .map(|turn| match turn {
            ConversationTurn::UserQuery(text) => message(
                bedrock::ConversationRole::User,
                vec![bedrock::ContentBlock::Text(text.clone())],
            ),
            ConversationTurn::ModelText(text) => message(
                bedrock::ConversationRole::Assistant,
                vec![bedrock::ContentBlock::Text(text.clone())],
            ),
            ConversationTurn::ToolCalls(requests) => message(
                bedrock::ConversationRole::Assistant,
                requests
                    .iter()
                    .map(convert_tool_call)
                    .collect::<Result<_, _>>()?,
            ),
            ConversationTurn::ToolResults(results) => message(
                bedrock::ConversationRole::User,
                results
                    .iter()
                    .map(convert_tool_result)
                    .collect::<Result<_, _>>()?,
            ),
        })
        .collect()
}

/// Convert a tool schema to a Bedrock `Tool::ToolSpec`.
pub fn convert_tool_schema(schema: &ToolSchema) -> Result<bedrock::Tool, GatewayError> {
    let spec = bedrock::ToolSpecification::builder()
        .name(&schema.name)
        .description(&schema.description)
        .input_schema(bedrock::ToolInputSchema::Json(json_to_document(
            &schema.input_schema,
        )))
        .build()
        .map_err(|e| build_error("tool specification", e))?;
    Ok(bedrock::Tool::ToolSpec(spec))
}

/// Build the tool configuration, or `None` when no tools are advertised.
pub fn convert_tool_config(
    tools: &[ToolSchema],
) -> Result<Option<bedrock::ToolConfiguration>, GatewayError> {
    if tools.is_empty() {
        return Ok(None);
    }

    let specs = tools
        .iter()
        .map(convert_tool_schema)
        .collect::<Result<Vec<_>, _>>()?;
    bedrock::ToolConfiguration::builder()
        .set_tools(Some(specs))
        .build()
        .map(Some)
        .map_err(|e| build_error("tool configuration", e))
}

// ─── JSON ↔ Document helpers ─────────────────────────────────────

/// Convert a serde_json::Value to an aws_smithy_types::Document.
pub fn json_to_document(value: &serde_json::Value) -> Document {
    match value {
        serde_json::Value::Null => Document::Null,
        serde_json::Value::Bool(b) => Document::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Document::Number(aws_smithy_types::Number::PosInt(u))
            } else if let Some(i) = n.as_i64() {
                Document::Number(aws_smithy_types::Number::NegInt(i))
            } else if let Some(f) = n.as_f64() {
                Document::Number(aws_smithy_types::Number::Float(f))
            } else {
                Document::Null
            }
        }
        serde_json::Value::String(s) => Document::String(s.clone()),
        serde_json::Value::Array(arr) => {
            Document::Array(arr.iter().map(json_to_document).collect())
        }
        serde_json::Value::Object(map) => Document::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_document(v)))
                .collect(),
        ),
    }
}

/// Convert an aws_smithy_types::Document to a serde_json::Value.
pub fn document_to_json(doc: &Document) -> serde_json::Value {
    match doc {
        Document::Null => serde_json::Value::Null,
        Document::Bool(b) => serde_json::Value::Bool(*b),
        Document::Number(n) => match n {
            aws_smithy_types::Number::PosInt(i) => serde_json::json!(*i),
            aws_smithy_types::Number::NegInt(i) => serde_json::json!(*i),
            aws_smithy_types::Number::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        },
        Document::String(s) => serde_json::Value::String(s.clone()),
        Document::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(document_to_json).collect())
        }
        Document::Object(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), document_to_json(v)))
                .collect(),
        ),
    }
}

// ─── Errors ──────────────────────────────────────────────────────

/// Convert a Bedrock SDK error to a GatewayError.
///
/// Transient conditions map to `BackendUnavailable` (retried by the loop),
/// everything else to `BackendRejected`.
pub fn convert_converse_error<R>(err: &SdkError<ConverseError, R>) -> GatewayError
where
    R: std::fmt::Debug,
{
    match err {
        SdkError::ServiceError(service_err) => match service_err.err() {
            ConverseError::ThrottlingException(e) => {
                GatewayError::BackendUnavailable(format!("Bedrock throttled: {}", e))
            }
            ConverseError::ServiceUnavailableException(e) => {
                GatewayError::BackendUnavailable(format!("Bedrock unavailable: {}", e))
            }
            ConverseError::ModelNotReadyException(e) => {
                GatewayError::BackendUnavailable(format!("Bedrock model not ready: {}", e))
            }
            ConverseError::ModelTimeoutException(e) => {
                GatewayError::BackendUnavailable(format!("Bedrock model timed out: {}", e))
            }
            ConverseError::InternalServerException(e) => {
                GatewayError::BackendUnavailable(format!("Bedrock internal error: {}", e))
            }
            ConverseError::ValidationException(e) => {
                GatewayError::BackendRejected(format!("Bedrock validation error: {}", e))
            }
            ConverseError::AccessDeniedException(e) => {
                GatewayError::BackendRejected(format!("Bedrock access denied: {}", e))
            }
            ConverseError::ResourceNotFoundException(e) => {
                GatewayError::BackendRejected(format!("Bedrock resource not found: {}", e))
            }
            other => GatewayError::BackendRejected(format!("Bedrock error: {:?}", other)),
        },
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            GatewayError::BackendUnavailable(format!("Bedrock request failed: {:?}", err))
        }
        other => GatewayError::BackendRejected(format!("Bedrock SDK error: {:?}", other)),
    }
}
