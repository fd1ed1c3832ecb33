//! Model backend adapters implementing [`ModelGateway`](toolloop_application::ModelGateway)

#[cfg(feature = "bedrock")]
pub mod bedrock;
