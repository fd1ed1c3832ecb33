//! Output formatter trait

use toolloop_application::{AgentLoopError, AgentLoopOutput};
use toolloop_domain::Query;

/// Trait for formatting agent loop outcomes
pub trait OutputFormatter {
    /// Format a successful run for humans
    fn format(&self, query: &Query, output: &AgentLoopOutput) -> String;

    /// Format a successful run as JSON
    fn format_json(&self, query: &Query, output: &AgentLoopOutput) -> String;

    /// Format a failed run
    fn format_error(&self, query: &Query, error: &AgentLoopError) -> String;
}
