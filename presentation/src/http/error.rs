use super::dto::{ErrorDetail, ErrorResponse, MissingQueryResponse};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use thiserror::Error;
use toolloop_application::{AgentLoopError, FailureKind};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind HTTP listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Request-level failure of the entry adapter
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing query parameter")]
    MissingQuery,

    #[error(transparent)]
    Loop(#[from] AgentLoopError),
}

/// HTTP status for a failed run
pub fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        FailureKind::BackendUnavailable | FailureKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        FailureKind::BackendRejected | FailureKind::ResponseParse => StatusCode::BAD_GATEWAY,
        FailureKind::IterationLimitExceeded | FailureKind::ToolServerFault => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingQuery => {
                (StatusCode::BAD_REQUEST, Json(MissingQueryResponse::default())).into_response()
            }
            ApiError::Loop(error) => {
                let body = ErrorResponse {
                    message: "Error processing query",
                    error: ErrorDetail {
                        kind: error.kind().to_string(),
                        detail: error.to_string(),
                    },
                };
                (status_for(error.kind()), Json(body)).into_response()
            }
        }
    }
}
