//! Agent Loop use case
//!
//! Answers one query by alternating between the model backend and the tool
//! server until the model produces a final answer:
//! 1. Start - Build the conversation from the preamble and the query
//! 2. AwaitingModel - Invoke the model (unavailable backends are retried)
//! 3. ExecutingTools - Run the requested batch, fold results back in
//! 4. Answered / Failed - Terminate
//!
//! The run is bounded by an invocation cap, an overall deadline and an
//! optional cancellation token.

mod types;

pub use types::{AgentLoopError, AgentLoopOutput, FailureKind};

use crate::config::LoopParams;
use crate::ports::model_gateway::{GatewayError, ModelGateway};
use crate::ports::progress::{LoopProgressNotifier, NoLoopProgress};
use crate::ports::tool_server::{ToolServerError, ToolServerPort};
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use toolloop_domain::{
    Conversation, LoopPhase, ModelResponse, Query, ToolCallRequest, ToolResult, ToolSchema,
    correlate,
};
use tracing::{debug, info, warn};

/// Use case for answering a query with a tool-using model
pub struct AgentLoop<G: ModelGateway + 'static, T: ToolServerPort + 'static> {
    gateway: Arc<G>,
    tool_server: Arc<T>,
    params: LoopParams,
    cancellation_token: Option<CancellationToken>,
}

impl<G, T> Clone for AgentLoop<G, T>
where
    G: ModelGateway + 'static,
    T: ToolServerPort + 'static,
{
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tool_server: self.tool_server.clone(),
            params: self.params.clone(),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

impl<G: ModelGateway + 'static, T: ToolServerPort + 'static> AgentLoop<G, T> {
    pub fn new(gateway: Arc<G>, tool_server: Arc<T>) -> Self {
        Self {
            gateway,
            tool_server,
            params: LoopParams::default(),
            cancellation_token: None,
        }
    }

    pub fn with_params(mut self, params: LoopParams) -> Self {
        self.params = params;
        self
    }

    /// Abort runs when this token is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn params(&self) -> &LoopParams {
        &self.params
    }

    pub fn tool_server(&self) -> &Arc<T> {
        &self.tool_server
    }

    /// Answer a query without progress reporting
    pub async fn run(&self, query: &Query) -> Result<AgentLoopOutput, AgentLoopError> {
        self.run_with_progress(query, &NoLoopProgress).await
    }

    /// Answer a query, reporting progress along the way
    pub async fn run_with_progress(
        &self,
        query: &Query,
        progress: &dyn LoopProgressNotifier,
    ) -> Result<AgentLoopOutput, AgentLoopError> {
        let started = Instant::now();
        info!(
            model = self.gateway.model_id(),
            max_invocations = self.params.max_model_invocations,
            "Starting agent loop"
        );

        let run = self.run_cancellable(query, progress, started);
        let result = match self.params.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, run).await {
                Ok(result) => result,
                Err(_) => Err(AgentLoopError::DeadlineExceeded {
                    elapsed: started.elapsed(),
                    deadline,
                }),
            },
            None => run.await,
        };

        match &result {
            Ok(output) => info!(
                invocations = output.model_invocations,
                tool_executions = output.tool_executions,
                elapsed_ms = output.elapsed.as_millis() as u64,
                "Agent loop answered"
            ),
            Err(e) => {
                warn!(kind = %e.kind(), "Agent loop failed: {}", e);
                progress.on_phase_change(LoopPhase::Failed);
            }
        }
        result
    }

    async fn run_cancellable(
        &self,
        query: &Query,
        progress: &dyn LoopProgressNotifier,
        started: Instant,
    ) -> Result<AgentLoopOutput, AgentLoopError> {
        match &self.cancellation_token {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(AgentLoopError::Cancelled),
                    result = self.drive(query, progress, started) => result,
                }
            }
            None => self.drive(query, progress, started).await,
        }
    }

    async fn drive(
        &self,
        query: &Query,
        progress: &dyn LoopProgressNotifier,
        started: Instant,
    ) -> Result<AgentLoopOutput, AgentLoopError> {
        let max_invocations = self.params.max_model_invocations;
        let mut conversation = Conversation::new(&self.params.preamble, query.to_prompt());
        let tools = self.tool_server.describe_tools();
        debug!(tools = tools.len(), "Advertising tools");

        let mut phase = LoopPhase::Start;
        let mut invocations = 0usize;
        let mut tool_executions = 0usize;

        loop {
            check_cancelled(&self.cancellation_token)?;
            if invocations >= max_invocations {
                return Err(AgentLoopError::IterationLimitExceeded { invocations });
            }

            advance(&mut phase, LoopPhase::AwaitingModel, progress);
            invocations += 1;
            progress.on_model_invocation(invocations, max_invocations);
            debug!(invocation = invocations, turns = conversation.len(), "Invoking model");

            match self.invoke_with_retry(&conversation, &tools, progress).await? {
                ModelResponse::FinalAnswer { text } => {
                    advance(&mut phase, LoopPhase::Answered, progress);
                    conversation.push_model_text(text.clone());
                    progress.on_answer(&text);
                    return Ok(AgentLoopOutput {
                        answer: text,
                        conversation,
                        model_invocations: invocations,
                        tool_executions,
                        elapsed: started.elapsed(),
                    });
                }
                ModelResponse::ToolCalls { requests } => {
                    // Results from this batch could never be shown to the model
                    if invocations >= max_invocations {
                        warn!(
                            invocations,
                            pending_calls = requests.len(),
                            "Model still requesting tools at the invocation cap"
                        );
                        return Err(AgentLoopError::IterationLimitExceeded { invocations });
                    }

                    conversation.push_tool_calls(requests.clone());
                    advance(&mut phase, LoopPhase::ExecutingTools, progress);

                    let results = self.execute_tools(&requests, progress).await?;
                    tool_executions += results.len();
                    conversation.push_tool_results(results);
                }
            }
        }
    }

    /// Invoke the model, retrying unavailable backends with backoff.
    ///
    /// Retries belong to one logical invocation.
    async fn invoke_with_retry(
        &self,
        conversation: &Conversation,
        tools: &[ToolSchema],
        progress: &dyn LoopProgressNotifier,
    ) -> Result<ModelResponse, AgentLoopError> {
        let policy = &self.params.retry;
        let mut retries = 0u32;

        loop {
            check_cancelled(&self.cancellation_token)?;
            match self.gateway.invoke(conversation, tools).await {
                Ok(response) => return Ok(response),
                Err(e) if policy.should_retry(&e, retries) => {
                    let delay = policy.backoff(retries);
                    retries += 1;
                    warn!(
                        attempt = retries,
                        max_retries = policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Model backend unavailable, retrying: {}",
                        e
                    );
                    progress.on_model_retry(retries, policy.max_retries, delay, &e.to_string());
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if let GatewayError::BackendUnavailable(_) = &e {
                        warn!(attempts = retries + 1, "Model backend retries exhausted");
                    }
                    return Err(AgentLoopError::from_gateway(e, retries + 1));
                }
            }
        }
    }

    /// Run one batch and re-associate its results with the requests by id.
    async fn execute_tools(
        &self,
        requests: &[ToolCallRequest],
        progress: &dyn LoopProgressNotifier,
    ) -> Result<Vec<ToolResult>, AgentLoopError> {
        for request in requests {
            debug!(tool = %request.tool_name, id = %request.id, "Dispatching tool call");
            progress.on_tool_call(request);
        }

        let results = self.tool_server.execute_batch(requests).await?;
        let results = correlate(requests, results).map_err(ToolServerError::from)?;

        for result in &results {
            if let Some(error) = result.error() {
                warn!(tool = %result.tool_name, id = %result.id, "Tool call failed: {}", error);
            }
            progress.on_tool_result(result);
        }
        Ok(results)
    }
}

fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), AgentLoopError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(AgentLoopError::Cancelled);
    }
    Ok(())
}

fn advance(phase: &mut LoopPhase, next: LoopPhase, progress: &dyn LoopProgressNotifier) {
    match phase.transition(next) {
        Ok(p) => *phase = p,
        Err(e) => {
            warn!("{}", e);
            *phase = next;
        }
    }
    progress.on_phase_change(*phase);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use toolloop_domain::{ConversationTurn, ToolError};

    // ==================== Test Infrastructure ====================

    /// Mock gateway that returns scripted responses in order
    struct ScriptedGateway {
        responses: Mutex<VecDeque<Result<ModelResponse, GatewayError>>>,
        /// Returned once the script runs out
        fallback: Option<ModelResponse>,
        calls: AtomicUsize,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<Result<ModelResponse, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                fallback: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn always(response: ModelResponse) -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                fallback: Some(response),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelGateway for ScriptedGateway {
        async fn invoke(
            &self,
            conversation: &Conversation,
            _tools: &[ToolSchema],
        ) -> Result<ModelResponse, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(matches!(
                conversation.turns().first(),
                Some(ConversationTurn::UserQuery(_))
            ));
            let next = self.responses.lock().unwrap().pop_front();
            match next {
                Some(response) => response,
                None => Ok(self
                    .fallback
                    .clone()
                    .unwrap_or_else(|| ModelResponse::final_answer("(no more responses)"))),
            }
        }
    }

    /// Mock tool server: answers every call, returning the batch reversed
    struct MockToolServer {
        delay: Option<Duration>,
        executions: AtomicUsize,
        /// Return a result with an id that was never requested
        corrupt_ids: bool,
    }

    impl MockToolServer {
        fn new() -> Self {
            Self {
                delay: None,
                executions: AtomicUsize::new(0),
                corrupt_ids: false,
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::new()
            }
        }

        fn executions(&self) -> usize {
            self.executions.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ToolServerPort for MockToolServer {
        fn describe_tools(&self) -> Vec<ToolSchema> {
            vec![ToolSchema {
                name: "get_alerts".into(),
                description: "Get weather alerts".into(),
                input_schema: serde_json::json!({"type": "object"}),
            }]
        }

        async fn execute(&self, request: &ToolCallRequest) -> ToolResult {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.executions.fetch_add(1, Ordering::SeqCst);
            if request.tool_name == "get_alerts" {
                ToolResult::success(&request.id, &request.tool_name, "No active alerts.")
            } else {
                ToolResult::failure(
                    &request.id,
                    &request.tool_name,
                    ToolError::unknown_tool(&request.tool_name),
                )
            }
        }

        async fn execute_batch(
            &self,
            requests: &[ToolCallRequest],
        ) -> Result<Vec<ToolResult>, ToolServerError> {
            let mut results = Vec::new();
            for request in requests.iter().rev() {
                let mut result = self.execute(request).await;
                if self.corrupt_ids {
                    result.id = format!("{}-stale", result.id);
                }
                results.push(result);
            }
            Ok(results)
        }
    }

    fn alerts_call(id: &str) -> ModelResponse {
        ModelResponse::tool_calls(vec![
            ToolCallRequest::new(id, "get_alerts").with_arg("state", "CA"),
        ])
    }

    fn query() -> Query {
        Query::try_new("Any weather alerts in California?").unwrap()
    }

    fn agent(gateway: &Arc<ScriptedGateway>, tools: &Arc<MockToolServer>) -> AgentLoop<ScriptedGateway, MockToolServer> {
        AgentLoop::new(gateway.clone(), tools.clone())
    }

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<LoopPhase>>,
        retries: AtomicUsize,
        tool_results: AtomicUsize,
    }

    impl LoopProgressNotifier for RecordingProgress {
        fn on_phase_change(&self, phase: LoopPhase) {
            self.phases.lock().unwrap().push(phase);
        }

        fn on_model_retry(&self, _attempt: u32, _max: u32, _delay: Duration, _error: &str) {
            self.retries.fetch_add(1, Ordering::SeqCst);
        }

        fn on_tool_result(&self, _result: &ToolResult) {
            self.tool_results.fetch_add(1, Ordering::SeqCst);
        }
    }

    // ==================== Error Types ====================

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            AgentLoopError::IterationLimitExceeded { invocations: 3 }.kind(),
            FailureKind::IterationLimitExceeded
        );
        assert_eq!(AgentLoopError::Cancelled.kind().as_str(), "cancelled");
        assert!(AgentLoopError::Cancelled.is_cancelled());
        assert!(!AgentLoopError::BackendRejected("x".into()).is_cancelled());

        let err = AgentLoopError::from_gateway(GatewayError::BackendUnavailable("503".into()), 4);
        assert_eq!(
            err,
            AgentLoopError::BackendUnavailable {
                attempts: 4,
                message: "503".into()
            }
        );
    }

    #[test]
    fn test_deadline_error_display() {
        let err = AgentLoopError::DeadlineExceeded {
            elapsed: Duration::from_millis(2001),
            deadline: Duration::from_secs(2),
        };
        assert_eq!(err.to_string(), "Deadline of 2000ms exceeded after 2001ms");
        assert_eq!(
            serde_json::to_value(err.kind()).unwrap(),
            serde_json::json!("deadline_exceeded")
        );
    }

    // ==================== Loop Behavior ====================

    #[tokio::test]
    async fn test_immediate_answer_uses_one_invocation() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok(ModelResponse::final_answer(
            "No alerts for California.",
        ))]));
        let tools = Arc::new(MockToolServer::new());

        let output = agent(&gateway, &tools).run(&query()).await.unwrap();

        assert_eq!(output.answer, "No alerts for California.");
        assert_eq!(output.model_invocations, 1);
        assert_eq!(output.tool_executions, 0);
        assert_eq!(gateway.calls(), 1);
        assert_eq!(output.conversation.len(), 2);
    }

    #[tokio::test]
    async fn test_one_tool_round_then_answer() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Ok(alerts_call("t1")),
            Ok(ModelResponse::final_answer("There are no active alerts.")),
        ]));
        let tools = Arc::new(MockToolServer::new());
        let progress = RecordingProgress::default();

        let output = agent(&gateway, &tools)
            .run_with_progress(&query(), &progress)
            .await
            .unwrap();

        assert_eq!(gateway.calls(), 2);
        assert_eq!(output.model_invocations, 2);
        assert_eq!(tools.executions(), 1);
        assert_eq!(output.tool_executions, 1);

        let kinds: Vec<&str> = output
            .conversation
            .turns()
            .iter()
            .map(|t| t.kind())
            .collect();
        assert_eq!(
            kinds,
            vec!["user_query", "tool_calls", "tool_results", "model_text"]
        );
        assert_eq!(
            *progress.phases.lock().unwrap(),
            vec![
                LoopPhase::AwaitingModel,
                LoopPhase::ExecutingTools,
                LoopPhase::AwaitingModel,
                LoopPhase::Answered,
            ]
        );
        assert_eq!(progress.tool_results.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_results_reassociated_by_id() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Ok(ModelResponse::tool_calls(vec![
                ToolCallRequest::new("abc", "get_alerts"),
                ToolCallRequest::new("def", "get_tides"),
            ])),
            Ok(ModelResponse::final_answer("done")),
        ]));
        let tools = Arc::new(MockToolServer::new());

        let output = agent(&gateway, &tools).run(&query()).await.unwrap();

        match &output.conversation.turns()[2] {
            ConversationTurn::ToolResults(results) => {
                assert_eq!(results[0].id, "abc");
                assert!(results[0].is_success());
                assert_eq!(results[1].id, "def");
                assert!(!results[1].is_success());
            }
            other => panic!("expected tool results, got {:?}", other),
        }
        assert_eq!(output.tool_executions, 2);
    }

    #[tokio::test]
    async fn test_iteration_cap_is_never_exceeded() {
        let gateway = Arc::new(ScriptedGateway::always(alerts_call("loop")));
        let tools = Arc::new(MockToolServer::new());

        let err = agent(&gateway, &tools)
            .with_params(LoopParams::default().with_max_model_invocations(4))
            .run(&query())
            .await
            .unwrap_err();

        assert_eq!(err, AgentLoopError::IterationLimitExceeded { invocations: 4 });
        assert_eq!(gateway.calls(), 4);
        // The last batch is never executed
        assert_eq!(tools.executions(), 3);
    }

    #[tokio::test]
    async fn test_zero_cap_never_invokes_model() {
        let gateway = Arc::new(ScriptedGateway::always(alerts_call("loop")));
        let tools = Arc::new(MockToolServer::new());

        let err = agent(&gateway, &tools)
            .with_params(LoopParams::default().with_max_model_invocations(0))
            .run(&query())
            .await
            .unwrap_err();

        assert_eq!(err, AgentLoopError::IterationLimitExceeded { invocations: 0 });
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_tool_hits_deadline() {
        let gateway = Arc::new(ScriptedGateway::always(alerts_call("slow")));
        let tools = Arc::new(MockToolServer::slow(Duration::from_secs(60)));
        let progress = RecordingProgress::default();

        let err = agent(&gateway, &tools)
            .with_params(LoopParams::default().with_deadline(Some(Duration::from_secs(5))))
            .run_with_progress(&query(), &progress)
            .await
            .unwrap_err();

        match err {
            AgentLoopError::DeadlineExceeded { elapsed, deadline } => {
                assert_eq!(deadline, Duration::from_secs(5));
                assert!(elapsed >= deadline);
                assert!(elapsed < Duration::from_secs(60));
            }
            other => panic!("expected DeadlineExceeded, got {:?}", other),
        }
        assert_eq!(progress.phases.lock().unwrap().last(), Some(&LoopPhase::Failed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_backend_is_retried() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Err(GatewayError::BackendUnavailable("ThrottlingException".into())),
            Err(GatewayError::BackendUnavailable("ThrottlingException".into())),
            Ok(ModelResponse::final_answer("Sunny.")),
        ]));
        let tools = Arc::new(MockToolServer::new());
        let progress = RecordingProgress::default();

        let output = agent(&gateway, &tools)
            .run_with_progress(&query(), &progress)
            .await
            .unwrap();

        assert_eq!(output.answer, "Sunny.");
        assert_eq!(output.model_invocations, 1);
        assert_eq!(gateway.calls(), 3);
        assert_eq!(progress.retries.load(Ordering::SeqCst), 2);
        // 250ms + 500ms of backoff
        assert!(output.elapsed >= Duration::from_millis(750));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exhausted() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Err(GatewayError::BackendUnavailable("503".into())),
            Err(GatewayError::BackendUnavailable("503".into())),
            Err(GatewayError::BackendUnavailable("503".into())),
        ]));
        let tools = Arc::new(MockToolServer::new());

        let err = agent(&gateway, &tools)
            .with_params(
                LoopParams::default().with_retry(RetryPolicy::default().with_max_retries(2)),
            )
            .run(&query())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AgentLoopError::BackendUnavailable {
                attempts: 3,
                message: "503".into()
            }
        );
        assert_eq!(gateway.calls(), 3);
    }

    #[tokio::test]
    async fn test_rejected_backend_is_not_retried() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Err(GatewayError::BackendRejected("ValidationException".into())),
            Ok(ModelResponse::final_answer("unreachable")),
        ]));
        let tools = Arc::new(MockToolServer::new());

        let err = agent(&gateway, &tools).run(&query()).await.unwrap_err();

        assert_eq!(err.kind(), FailureKind::BackendRejected);
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_parse_error_is_terminal() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Err(GatewayError::ResponseParse(
            "unsupported stop reason".into(),
        ))]));
        let tools = Arc::new(MockToolServer::new());

        let err = agent(&gateway, &tools).run(&query()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::ResponseParse);
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_mismatched_results_fail_the_run() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok(alerts_call("t1"))]));
        let tools = Arc::new(MockToolServer {
            corrupt_ids: true,
            ..MockToolServer::new()
        });

        let err = agent(&gateway, &tools).run(&query()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::ToolServerFault);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok(ModelResponse::final_answer(
            "unreachable",
        ))]));
        let tools = Arc::new(MockToolServer::new());
        let token = CancellationToken::new();
        token.cancel();

        let err = agent(&gateway, &tools)
            .with_cancellation(token)
            .run(&query())
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_url_context_reaches_first_turn() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok(ModelResponse::final_answer(
            "summary",
        ))]));
        let tools = Arc::new(MockToolServer::new());
        let query = Query::try_new("Summarize")
            .unwrap()
            .with_url(Some("https://example.com".to_string()));

        let output = agent(&gateway, &tools).run(&query).await.unwrap();
        assert_eq!(
            output.conversation.query(),
            Some("Summarize\n\nURL: https://example.com")
        );
    }
}
