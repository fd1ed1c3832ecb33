//! Console output formatter for agent loop results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use serde_json::json;
use toolloop_application::{AgentLoopError, AgentLoopOutput};
use toolloop_domain::Query;

/// Formats agent loop results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the answer followed by run statistics
    pub fn format(query: &Query, output: &AgentLoopOutput) -> String {
        let mut text = String::new();

        text.push_str(&format!("{} {}\n", "Q:".bold(), query.text()));
        if let Some(url) = query.url() {
            text.push_str(&format!("{} {}\n", "URL:".dimmed(), url));
        }
        text.push('\n');
        text.push_str(output.answer.trim_end());
        text.push('\n');
        text.push_str(&format!("\n{}\n", Self::stats(output).dimmed()));

        text
    }

    /// Format as JSON: answer, statistics and the full transcript
    pub fn format_json(query: &Query, output: &AgentLoopOutput) -> String {
        let document = json!({
            "query": query.text(),
            "url": query.url(),
            "result": output.answer,
            "model_invocations": output.model_invocations,
            "tool_executions": output.tool_executions,
            "elapsed_ms": output.elapsed.as_millis() as u64,
            "conversation": output.conversation,
        });
        serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a failure with its machine-readable kind
    pub fn format_error(query: &Query, error: &AgentLoopError) -> String {
        format!(
            "{} {}\n{} [{}] {}\n",
            "Q:".bold(),
            query.text(),
            "Error:".red().bold(),
            error.kind(),
            error
        )
    }

    fn stats(output: &AgentLoopOutput) -> String {
        format!(
            "{} model invocation(s), {} tool call(s), {:.1}s",
            output.model_invocations,
            output.tool_executions,
            output.elapsed.as_secs_f64()
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, query: &Query, output: &AgentLoopOutput) -> String {
        Self::format(query, output)
    }

    fn format_json(&self, query: &Query, output: &AgentLoopOutput) -> String {
        Self::format_json(query, output)
    }

    fn format_error(&self, query: &Query, error: &AgentLoopError) -> String {
        Self::format_error(query, error)
    }
}
