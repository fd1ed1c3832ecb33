use super::dto::{HealthResponse, QueryParams, QueryResponse};
use super::error::ApiError;
use super::state::ServerState;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query as QueryString, State};
use std::sync::Arc;
use toolloop_domain::Query;
use tracing::{info, warn};

pub async fn query_get(
    State(state): State<Arc<ServerState>>,
    params: Result<QueryString<QueryParams>, QueryRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let params = params.map(|QueryString(p)| p).unwrap_or_default();
    answer(&state, params).await
}

pub async fn query_post(
    State(state): State<Arc<ServerState>>,
    body: Result<Json<QueryParams>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let params = body.map(|Json(p)| p).unwrap_or_default();
    answer(&state, params).await
}

pub async fn health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        tools: state.runner().tool_names(),
    })
}

async fn answer(state: &ServerState, params: QueryParams) -> Result<Json<QueryResponse>, ApiError> {
    let Some(query) = params.query.and_then(Query::try_new) else {
        warn!("Rejecting request without a query");
        return Err(ApiError::MissingQuery);
    };
    let query = query.with_url(params.url);

    info!(query = %query, url = query.url(), "Received query");
    match state.runner().answer(&query).await {
        Ok(output) => {
            info!(
                invocations = output.model_invocations,
                tools = output.tool_executions,
                "Query answered"
            );
            Ok(Json(QueryResponse {
                query: query.text().to_string(),
                result: output.answer,
            }))
        }
        Err(error) => {
            warn!(kind = %error.kind(), "Query failed: {}", error);
            Err(ApiError::Loop(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::state::QueryRunner;
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::time::Duration;
    use toolloop_application::{AgentLoopError, AgentLoopOutput};
    use toolloop_domain::Conversation;

    /// Runner that answers with a fixed outcome and records what it was asked
    struct FixedRunner {
        outcome: Result<String, AgentLoopError>,
        seen: Mutex<Vec<Query>>,
    }

    impl FixedRunner {
        fn answering(text: &str) -> Self {
            Self {
                outcome: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: AgentLoopError) -> Self {
            Self {
                outcome: Err(error),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl QueryRunner for FixedRunner {
        async fn answer(&self, query: &Query) -> Result<AgentLoopOutput, AgentLoopError> {
            self.seen.lock().unwrap().push(query.clone());
            let answer = self.outcome.clone()?;
            let mut conversation = Conversation::new("", query.to_prompt());
            conversation.push_model_text(answer.clone());
            Ok(AgentLoopOutput {
                answer,
                conversation,
                model_invocations: 1,
                tool_executions: 0,
                elapsed: Duration::from_millis(5),
            })
        }

        fn tool_names(&self) -> Vec<String> {
            vec!["get_alerts".to_string(), "get_forecast".to_string()]
        }
    }

    fn state(runner: FixedRunner) -> (Arc<FixedRunner>, State<Arc<ServerState>>) {
        let runner = Arc::new(runner);
        let state = Arc::new(ServerState::new(runner.clone()));
        (runner, State(state))
    }

    fn params(query: Option<&str>, url: Option<&str>) -> QueryParams {
        QueryParams {
            query: query.map(String::from),
            url: url.map(String::from),
        }
    }

    async fn into_parts(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(runner: FixedRunner, query: Option<&str>, url: Option<&str>) -> (StatusCode, Value) {
        let (_, state) = state(runner);
        let response = query_get(state, Ok(QueryString(params(query, url))))
            .await
            .into_response();
        into_parts(response).await
    }

    #[tokio::test]
    async fn test_missing_query_is_bad_request() {
        let (status, body) = get(FixedRunner::answering("unused"), None, None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "message": "Missing query parameter",
                "usage": "Add a query parameter to your request"
            })
        );
    }

    #[tokio::test]
    async fn test_blank_query_is_bad_request() {
        let (status, _) = get(FixedRunner::answering("unused"), Some("   "), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_success_shape() {
        let (status, body) = get(
            FixedRunner::answering("No active alerts for this state."),
            Some("Any alerts in CA?"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"query": "Any alerts in CA?", "result": "No active alerts for this state."})
        );
    }

    #[tokio::test]
    async fn test_url_is_passed_to_runner() {
        let (runner, state) = state(FixedRunner::answering("A summary."));
        query_get(
            state,
            Ok(QueryString(params(Some("Summarize"), Some("https://example.com")))),
        )
        .await
        .unwrap();

        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn test_post_body() {
        let (_, state) = state(FixedRunner::answering("Sunny."));
        let response = query_post(state, Ok(Json(params(Some("Weather in NYC?"), None))))
            .await
            .into_response();
        let (status, body) = into_parts(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], "Sunny.");
    }

    #[tokio::test]
    async fn test_failure_status_mapping() {
        let cases = [
            (
                AgentLoopError::DeadlineExceeded {
                    elapsed: Duration::from_secs(26),
                    deadline: Duration::from_secs(25),
                },
                StatusCode::GATEWAY_TIMEOUT,
                "deadline_exceeded",
            ),
            (
                AgentLoopError::BackendUnavailable {
                    attempts: 4,
                    message: "throttled".into(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
                "backend_unavailable",
            ),
            (
                AgentLoopError::BackendRejected("bad model".into()),
                StatusCode::BAD_GATEWAY,
                "backend_rejected",
            ),
            (
                AgentLoopError::ResponseParse("no tool calls".into()),
                StatusCode::BAD_GATEWAY,
                "response_parse",
            ),
            (
                AgentLoopError::IterationLimitExceeded { invocations: 10 },
                StatusCode::INTERNAL_SERVER_ERROR,
                "iteration_limit_exceeded",
            ),
            (
                AgentLoopError::Cancelled,
                StatusCode::SERVICE_UNAVAILABLE,
                "cancelled",
            ),
        ];

        for (error, expected_status, expected_kind) in cases {
            let detail = error.to_string();
            let (status, body) = get(FixedRunner::failing(error), Some("hi"), None).await;

            assert_eq!(status, expected_status);
            assert_eq!(body["message"], "Error processing query");
            assert_eq!(body["error"]["kind"], expected_kind);
            assert_eq!(body["error"]["detail"], detail.as_str());
        }
    }

    #[tokio::test]
    async fn test_health_lists_tools() {
        let (_, state) = state(FixedRunner::answering("unused"));
        let Json(health) = health(state).await;

        assert_eq!(health.status, "ok");
        assert_eq!(health.tools, vec!["get_alerts", "get_forecast"]);
    }
}
