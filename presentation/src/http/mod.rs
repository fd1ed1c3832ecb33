//! HTTP entry adapter
//!
//! Exposes the agent loop over HTTP:
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /query?query=...&url=...` | Answer a query |
//! | `POST /query` | Same, with a JSON body `{"query": ..., "url": ...}` |
//! | `GET /health` | Liveness and the advertised tool names |

mod dto;
mod error;
mod routes;
mod state;

pub use dto::{ErrorDetail, ErrorResponse, HealthResponse, MissingQueryResponse, QueryParams, QueryResponse};
pub use error::{ApiError, ServerError, status_for};
pub use state::{QueryRunner, ServerState};

use axum::Router;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Build the router for the entry adapter
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/query", get(routes::query_get).post(routes::query_post))
        .route("/health", get(routes::health))
        .with_state(state)
}

/// Serve until `shutdown` is cancelled
pub async fn serve(
    runner: Arc<dyn QueryRunner>,
    addr: SocketAddr,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    info!(%addr, "Binding HTTP entry adapter");
    let app = router(Arc::new(ServerState::new(runner)));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "HTTP entry adapter ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(ServerError::Serve)
}
