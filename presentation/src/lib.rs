//! Presentation layer for toolloop
//!
//! This crate contains CLI definitions, the HTTP entry adapter,
//! output formatters and progress reporters.

pub mod cli;
pub mod http;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use http::{QueryRunner, ServerError, ServerState};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
