//! Tool Server
//!
//! [`ToolServer`] implements [`ToolServerPort`] on top of a [`ToolRegistry`]:
//! it describes the registered tools as JSON Schema and executes calls,
//! turning every failure into an error [`ToolResult`].
//!
//! Each call runs on its own task under a per-call timeout, so a hung or
//! panicking handler yields a `TIMEOUT` / `EXECUTION_FAILED` result instead
//! of stalling or crashing the loop. Batches run concurrently on a
//! [`JoinSet`] and are re-associated with their requests by id.
//!
//! Handler tasks are aborted when their caller is dropped, so an abandoned
//! batch (deadline, cancellation) leaves nothing running.

use super::registry::ToolRegistry;
use super::schema::JsonSchemaToolConverter;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::task::AbortOnDropHandle;
use toolloop_application::ports::tool_schema::ToolSchemaPort;
use toolloop_application::ports::tool_server::{ToolServerError, ToolServerPort};
use toolloop_domain::tool::{
    batch::{correlate, ensure_unique_ids},
    entities::{ToolCallRequest, ToolSchema},
    value_objects::{ToolError, ToolResult},
};
use tracing::{debug, warn};

/// Default per-call timeout
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Tool server backed by a [`ToolRegistry`]
#[derive(Clone)]
pub struct ToolServer {
    registry: Arc<ToolRegistry>,
    schema: Arc<dyn ToolSchemaPort>,
    call_timeout: Duration,
}

impl ToolServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            schema: Arc::new(JsonSchemaToolConverter),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_schema_converter(mut self, schema: Arc<dyn ToolSchemaPort>) -> Self {
        self.schema = schema;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }
}

#[async_trait]
impl ToolServerPort for ToolServer {
    fn describe_tools(&self) -> Vec<ToolSchema> {
        self.schema.all_tools_schema(self.registry.list_definitions())
    }

    async fn execute(&self, request: &ToolCallRequest) -> ToolResult {
        let registry = self.registry.clone();
        let name = request.tool_name.clone();
        let arguments = request.arguments.clone();
        let task = tokio::spawn(async move { registry.invoke(&name, &arguments).await });
        let mut handle = AbortOnDropHandle::new(task);

        let joined = match tokio::time::timeout(self.call_timeout, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                handle.abort();
                warn!(
                    tool = %request.tool_name,
                    id = %request.id,
                    timeout_ms = self.call_timeout.as_millis() as u64,
                    "Tool call timed out"
                );
                return ToolResult::failure(
                    &request.id,
                    &request.tool_name,
                    ToolError::timeout(&request.tool_name, self.call_timeout.as_millis() as u64),
                );
            }
        };

        match joined {
            Ok(Ok(output)) => {
                debug!(tool = %request.tool_name, id = %request.id, "Tool call succeeded");
                ToolResult::success(&request.id, &request.tool_name, output)
            }
            Ok(Err(e)) => ToolResult::failure(&request.id, &request.tool_name, e.to_tool_error()),
            Err(join_error) => {
                warn!(tool = %request.tool_name, id = %request.id, "Tool task failed: {}", join_error);
                ToolResult::failure(
                    &request.id,
                    &request.tool_name,
                    ToolError::execution_failed(format!(
                        "Tool {} crashed: {}",
                        request.tool_name, join_error
                    )),
                )
            }
        }
    }

    async fn execute_batch(
        &self,
        requests: &[ToolCallRequest],
    ) -> Result<Vec<ToolResult>, ToolServerError> {
        ensure_unique_ids(requests)?;
        debug!(calls = requests.len(), "Executing tool batch");

        let mut join_set = JoinSet::new();
        for request in requests.iter().cloned() {
            let server = self.clone();
            join_set.spawn(async move { server.execute(&request).await });
        }

        let mut results = Vec::with_capacity(requests.len());
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    join_set.abort_all();
                    return Err(ToolServerError::TaskFailed(e.to_string()));
                }
            }
        }

        Ok(correlate(requests, results)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use toolloop_domain::CorrelationError;
    use toolloop_domain::tool::entities::{ParamType, ToolArguments, ToolDefinition, ToolParameter};
    use toolloop_domain::tool::handler::{ToolHandlerError, tool_fn};
    use toolloop_domain::tool::value_objects::ToolErrorKind;

    fn server() -> ToolServer {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDefinition::new("echo", "Echo the text back").with_parameter(
                    ToolParameter::new("text", "Text to echo", true).with_type(ParamType::String),
                ),
                tool_fn(|args: ToolArguments| async move { Ok(args["text"].clone()) }),
            )
            .unwrap();
        registry
            .register(
                ToolDefinition::new("fail", "Always fails"),
                tool_fn(|_args: ToolArguments| async move {
                    Err(ToolHandlerError::failed("disk on fire"))
                }),
            )
            .unwrap();
        registry
            .register(
                ToolDefinition::new("hang", "Never returns in time"),
                tool_fn(|_args: ToolArguments| async move {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(json!("too late"))
                }),
            )
            .unwrap();
        registry
            .register(
                ToolDefinition::new("crash", "Panics"),
                tool_fn(|args: ToolArguments| async move {
                    if args.is_empty() {
                        panic!("handler bug");
                    }
                    Ok(json!(null))
                }),
            )
            .unwrap();
        ToolServer::new(registry)
    }

    fn echo(id: &str, text: &str) -> ToolCallRequest {
        ToolCallRequest::new(id, "echo").with_arg("text", text)
    }

    #[test]
    fn test_describe_tools_matches_definitions() {
        let server = server();
        let described: Vec<String> = server.describe_tools().into_iter().map(|s| s.name).collect();
        let defined: Vec<String> = server
            .registry()
            .list_definitions()
            .iter()
            .map(|d| d.name.clone())
            .collect();

        assert_eq!(described, defined);
        assert_eq!(described, vec!["echo", "fail", "hang", "crash"]);
    }

    #[tokio::test]
    async fn test_execute_success() {
        let result = server().execute(&echo("t1", "hello")).await;

        assert!(result.is_success());
        assert_eq!(result.id, "t1");
        assert_eq!(result.output(), Some(&json!("hello")));
    }

    #[tokio::test]
    async fn test_execute_never_propagates_failures() {
        let server = server();

        let failed = server.execute(&ToolCallRequest::new("a", "fail")).await;
        assert_eq!(failed.error().map(|e| e.kind), Some(ToolErrorKind::ExecutionFailed));
        assert_eq!(failed.error().map(|e| e.message.as_str()), Some("disk on fire"));

        let unknown = server.execute(&ToolCallRequest::new("b", "get_tides")).await;
        assert_eq!(unknown.error().map(|e| e.kind), Some(ToolErrorKind::UnknownTool));

        let invalid = server
            .execute(&ToolCallRequest::new("c", "echo").with_arg("text", 42))
            .await;
        assert_eq!(invalid.error().map(|e| e.kind), Some(ToolErrorKind::InvalidArguments));
        assert_eq!(invalid.id, "c");
    }

    #[tokio::test]
    async fn test_panicking_handler_becomes_error_result() {
        let result = server().execute(&ToolCallRequest::new("p", "crash")).await;

        assert!(!result.is_success());
        assert_eq!(result.id, "p");
        assert_eq!(result.error().map(|e| e.kind), Some(ToolErrorKind::ExecutionFailed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_handler_times_out() {
        let server = server().with_call_timeout(Duration::from_secs(2));

        let result = server.execute(&ToolCallRequest::new("h", "hang")).await;
        let error = result.error().unwrap();

        assert_eq!(error.kind, ToolErrorKind::Timeout);
        assert_eq!(error.message, "Tool hang timed out after 2000 ms");
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_batch_aborts_handlers() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDefinition::new("slow", "Finishes after 20 seconds"),
                tool_fn(move |_args: ToolArguments| {
                    let flag = flag.clone();
                    async move {
                        tokio::time::sleep(Duration::from_secs(20)).await;
                        flag.store(true, Ordering::SeqCst);
                        Ok(json!("done"))
                    }
                }),
            )
            .unwrap();
        let server = ToolServer::new(registry);

        let requests = vec![ToolCallRequest::new("s1", "slow")];
        let abandoned =
            tokio::time::timeout(Duration::from_secs(1), server.execute_batch(&requests)).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_batch_returns_one_result_per_request() {
        let requests = vec![
            echo("r1", "one"),
            ToolCallRequest::new("r2", "fail"),
            echo("r3", "three"),
            ToolCallRequest::new("r4", "missing_tool"),
        ];

        let results = server().execute_batch(&requests).await.unwrap();

        assert_eq!(results.len(), requests.len());
        let request_ids: HashSet<&str> = requests.iter().map(|r| r.id.as_str()).collect();
        let result_ids: HashSet<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(request_ids, result_ids);

        // Request order is preserved
        assert_eq!(results[0].output(), Some(&json!("one")));
        assert_eq!(results[2].output(), Some(&json!("three")));
        assert!(!results[1].is_success());
        assert!(!results[3].is_success());
    }

    #[tokio::test]
    async fn test_batch_rejects_duplicate_ids() {
        let requests = vec![echo("dup", "a"), echo("dup", "b")];

        let err = server().execute_batch(&requests).await.unwrap_err();
        assert_eq!(
            err,
            ToolServerError::Correlation(CorrelationError::DuplicateRequestId("dup".into()))
        );
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let results = server().execute_batch(&[]).await.unwrap();
        assert!(results.is_empty());
    }
}
