//! Progress reporting for agent loop runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use toolloop_application::ports::progress::LoopProgressNotifier;
use toolloop_domain::{LoopPhase, ToolCallRequest, ToolResult};

/// Reports progress with a spinner on stderr
pub struct ProgressReporter {
    spinner: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { spinner }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Clear the spinner (call before printing the answer)
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.spinner.finish_and_clear();
    }
}

impl LoopProgressNotifier for ProgressReporter {
    fn on_phase_change(&self, phase: LoopPhase) {
        self.spinner.set_prefix(phase.display_name().to_string());
        if phase.is_terminal() {
            self.spinner.finish_and_clear();
        }
    }

    fn on_model_invocation(&self, invocation: usize, max_invocations: usize) {
        self.spinner
            .set_message(format!("invocation {}/{}", invocation, max_invocations));
    }

    fn on_model_retry(&self, attempt: u32, max_retries: u32, delay: Duration, error: &str) {
        self.spinner.println(format!(
            "  {} retry {}/{} in {}ms: {}",
            "!".yellow(),
            attempt,
            max_retries,
            delay.as_millis(),
            error
        ));
    }

    fn on_tool_call(&self, request: &ToolCallRequest) {
        self.spinner.set_message(format!("running {}", request.tool_name));
    }

    fn on_tool_result(&self, result: &ToolResult) {
        self.spinner.println(tool_result_line(result));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl LoopProgressNotifier for SimpleProgress {
    fn on_model_invocation(&self, invocation: usize, max_invocations: usize) {
        eprintln!(
            "{} {} ({}/{})",
            "->".cyan(),
            "Asking model".bold(),
            invocation,
            max_invocations
        );
    }

    fn on_model_retry(&self, attempt: u32, max_retries: u32, delay: Duration, error: &str) {
        eprintln!(
            "  {} retry {}/{} in {}ms: {}",
            "!".yellow(),
            attempt,
            max_retries,
            delay.as_millis(),
            error
        );
    }

    fn on_tool_result(&self, result: &ToolResult) {
        eprintln!("{}", tool_result_line(result));
    }
}

fn tool_result_line(result: &ToolResult) -> String {
    match result.error() {
        None => format!("  {} {} [{}]", "v".green(), result.tool_name, result.id),
        Some(error) => format!(
            "  {} {} [{}] {}: {}",
            "x".red(),
            result.tool_name,
            result.id,
            error.kind,
            error.message
        ),
    }
}
