use async_trait::async_trait;
use std::sync::Arc;
use toolloop_application::{
    AgentLoop, AgentLoopError, AgentLoopOutput, ModelGateway, ToolServerPort,
};
use toolloop_domain::Query;

/// Something that can answer queries; the HTTP adapter's view of the agent loop.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    async fn answer(&self, query: &Query) -> Result<AgentLoopOutput, AgentLoopError>;

    /// Names of the tools advertised to the model
    fn tool_names(&self) -> Vec<String>;
}

#[async_trait]
impl<G, T> QueryRunner for AgentLoop<G, T>
where
    G: ModelGateway + 'static,
    T: ToolServerPort + 'static,
{
    async fn answer(&self, query: &Query) -> Result<AgentLoopOutput, AgentLoopError> {
        self.run(query).await
    }

    fn tool_names(&self) -> Vec<String> {
        self.tool_server()
            .describe_tools()
            .into_iter()
            .map(|schema| schema.name)
            .collect()
    }
}

pub struct ServerState {
    runner: Arc<dyn QueryRunner>,
}

impl ServerState {
    pub fn new(runner: Arc<dyn QueryRunner>) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> Arc<dyn QueryRunner> {
        Arc::clone(&self.runner)
    }
}
