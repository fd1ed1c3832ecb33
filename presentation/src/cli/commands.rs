//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable answer with run statistics
    Text,
    /// JSON document with the answer and the full transcript
    Json,
}

/// CLI arguments for toolloop
#[derive(Parser, Debug)]
#[command(name = "toolloop")]
#[command(author, version, about = "Answer questions with an LLM that can call tools")]
#[command(long_about = r#"
toolloop answers a natural-language query with a model that can call tools
(weather alerts, forecasts, web pages) until it has a final answer.

Run a single query from the command line, or start the HTTP entry adapter
with --serve and send GET /query?query=... requests.

Configuration files are loaded from (in priority order):
1. TOOLLOOP_* environment variables (e.g. TOOLLOOP_AGENT__DEADLINE_SECS=10)
2. --config <path>      Explicit config file
3. ./toolloop.toml      Project-level config
4. ~/.config/toolloop/config.toml   Global config

Example:
  toolloop "Are there any weather alerts in CA?"
  toolloop --url https://example.com "Summarize this page"
  toolloop --serve --bind 0.0.0.0:3000
"#)]
pub struct Cli {
    /// The query to answer (not required with --serve)
    pub query: Option<String>,

    /// URL handed to the model as context for the query
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Start the HTTP entry adapter instead of answering a single query
    #[arg(long)]
    pub serve: bool,

    /// Address for the HTTP entry adapter (overrides server.bind)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Maximum model invocations per query (overrides agent.max_model_invocations)
    #[arg(long, value_name = "N")]
    pub max_invocations: Option<usize>,

    /// Overall deadline per query in seconds, 0 disables it (overrides agent.deadline_secs)
    #[arg(long, value_name = "SECS")]
    pub deadline_secs: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to this file (overrides logging.file)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_single_query() {
        let cli = Cli::parse_from([
            "toolloop",
            "Any alerts in CA?",
            "--max-invocations",
            "3",
            "-vv",
            "--output",
            "json",
        ]);

        assert_eq!(cli.query.as_deref(), Some("Any alerts in CA?"));
        assert_eq!(cli.max_invocations, Some(3));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(!cli.serve);
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["toolloop", "--serve", "--bind", "0.0.0.0:8080", "--no-config"]);

        assert!(cli.serve);
        assert!(cli.query.is_none());
        assert_eq!(cli.bind.as_deref(), Some("0.0.0.0:8080"));
        assert!(cli.no_config);
        assert_eq!(cli.output, OutputFormat::Text);
    }
}
