//! Tool handler abstraction
//!
//! A [`ToolHandler`] is the executable half of a registered tool: it
//! receives already-validated arguments and returns a JSON value. Handlers
//! are supplied by infrastructure (HTTP-backed weather lookups, page
//! fetches) or by tests as plain async closures via [`tool_fn`].

use super::entities::ToolArguments;
use async_trait::async_trait;
use futures::future::BoxFuture;
use thiserror::Error;

/// Failure raised by a tool handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolHandlerError {
    /// Generic failure with a human-readable message
    #[error("{0}")]
    Failed(String),

    /// An upstream service answered with a non-success status
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },
}

impl ToolHandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Executable behavior of a tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn invoke(&self, arguments: &ToolArguments)
    -> Result<serde_json::Value, ToolHandlerError>;
}

type HandlerFuture = BoxFuture<'static, Result<serde_json::Value, ToolHandlerError>>;

/// [`ToolHandler`] backed by a closure.
///
/// Build one with [`tool_fn`].
pub struct FnToolHandler {
    f: Box<dyn Fn(ToolArguments) -> HandlerFuture + Send + Sync>,
}

impl std::fmt::Debug for FnToolHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnToolHandler").finish_non_exhaustive()
    }
}

/// Adapt an async closure into a [`ToolHandler`].
///
/// The closure receives an owned copy of the arguments so the returned
/// future can be `'static`.
///
/// ```
/// use toolloop_domain::tool::handler::tool_fn;
///
/// let echo = tool_fn(|args| async move {
///     Ok(args.get("text").cloned().unwrap_or_default())
/// });
/// # let _ = echo;
/// ```
pub fn tool_fn<F, Fut>(f: F) -> FnToolHandler
where
    F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<serde_json::Value, ToolHandlerError>>
        + Send
        + 'static,
{
    FnToolHandler {
        f: Box::new(move |args| Box::pin(f(args))),
    }
}

#[async_trait]
impl ToolHandler for FnToolHandler {
    async fn invoke(
        &self,
        arguments: &ToolArguments,
    ) -> Result<serde_json::Value, ToolHandlerError> {
        (self.f)(arguments.clone()).await
    }
}
