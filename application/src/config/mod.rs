//! Application-level configuration.
//!
//! This module provides configuration types that control how the agent loop
//! behaves:
//!
//! - [`LoopParams`]: invocation cap, deadline, preamble
//! - [`RetryPolicy`]: exponential backoff for unavailable backends

pub mod loop_params;
pub mod retry_policy;

pub use loop_params::{DEFAULT_PREAMBLE, LoopParams};
pub use retry_policy::RetryPolicy;
