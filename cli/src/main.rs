//! CLI entrypoint for toolloop
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use toolloop_application::{
    AgentLoop, ModelGateway, NoLoopProgress, ToolServerPort,
};
use toolloop_domain::Query;
use toolloop_infrastructure::{ConfigLoader, FileConfig, ToolServer, default_registry};
use toolloop_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, http};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("failed to load configuration")?
    };
    apply_cli_overrides(&mut config, &cli);

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        println!();
        println!("{}", config.to_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref())?;
    info!("Starting toolloop");

    let issues = config.validate();
    if !issues.is_empty() {
        let messages: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
        bail!("invalid configuration:\n  {}", messages.join("\n  "));
    }

    // Cancel in-flight runs (and the server) on Ctrl-C
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            signal_token.cancel();
        }
    });

    // === Dependency Injection ===
    let registry = default_registry(&config.tools)?;
    let tool_server = ToolServer::new(registry)
        .with_call_timeout(Duration::from_secs(config.tools.call_timeout_secs));

    connect_backend(cli, config, tool_server, shutdown).await
}

#[cfg(feature = "bedrock")]
async fn connect_backend(
    cli: Cli,
    config: FileConfig,
    tool_server: ToolServer,
    shutdown: CancellationToken,
) -> Result<ExitCode> {
    let gateway = toolloop_infrastructure::BedrockGateway::new(&config.bedrock).await;
    run(cli, config, gateway, tool_server, shutdown).await
}

#[cfg(not(feature = "bedrock"))]
async fn connect_backend(
    _cli: Cli,
    _config: FileConfig,
    _tool_server: ToolServer,
    _shutdown: CancellationToken,
) -> Result<ExitCode> {
    bail!("toolloop was built without a model backend; enable the `bedrock` feature")
}

#[cfg_attr(not(feature = "bedrock"), allow(dead_code))]
async fn run<G, T>(
    cli: Cli,
    config: FileConfig,
    gateway: G,
    tool_server: T,
    shutdown: CancellationToken,
) -> Result<ExitCode>
where
    G: ModelGateway + 'static,
    T: ToolServerPort + 'static,
{
    let agent_loop = AgentLoop::new(Arc::new(gateway), Arc::new(tool_server))
        .with_params(config.agent.to_loop_params())
        .with_cancellation(shutdown.clone());

    if cli.serve {
        let addr: SocketAddr = config
            .server
            .bind
            .parse()
            .with_context(|| format!("invalid bind address '{}'", config.server.bind))?;
        http::serve(Arc::new(agent_loop), addr, shutdown).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(text) = cli.query else {
        bail!("A query is required. Use --serve to start the HTTP entry adapter.");
    };
    let Some(query) = Query::try_new(text) else {
        bail!("The query must not be blank.");
    };
    let query = query.with_url(cli.url);

    let outcome = if cli.quiet {
        agent_loop.run_with_progress(&query, &NoLoopProgress).await
    } else {
        let progress = ProgressReporter::new();
        let outcome = agent_loop
            .run_with_progress(&query, &progress)
            .await;
        progress.finish();
        outcome
    };

    match outcome {
        Ok(output) => {
            let rendered = match cli.output {
                OutputFormat::Text => ConsoleFormatter::format(&query, &output),
                OutputFormat::Json => ConsoleFormatter::format_json(&query, &output),
            };
            println!("{}", rendered);
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            eprint!("{}", ConsoleFormatter::format_error(&query, &error));
            Ok(ExitCode::FAILURE)
        }
    }
}

/// CLI flags take precedence over every configuration source
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(max) = cli.max_invocations {
        config.agent.max_model_invocations = max;
    }
    if let Some(secs) = cli.deadline_secs {
        config.agent.deadline_secs = secs;
    }
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(path) = &cli.log_file {
        config.logging.file = Some(path.clone());
    }
}

/// Initialize logging based on verbosity level (or `RUST_LOG` when no -v is given)
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("invalid log file path '{}'", path.display()))?;
            std::fs::create_dir_all(directory)
                .with_context(|| format!("failed to create log directory '{}'", directory.display()))?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
