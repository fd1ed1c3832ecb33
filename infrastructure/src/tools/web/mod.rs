//! **Web Tools**: `visit_webpage`
//!
//! Gives the model access to page content, gated behind the `web-tools`
//! Cargo feature flag.
//!
//! | Tool | Description | Key Dependency |
//! |------|-------------|----------------|
//! | `visit_webpage` | Fetch a URL and convert its HTML to Markdown | `reqwest` + `scraper` |

mod visit;

pub use visit::{VISIT_WEBPAGE, VisitWebpage, collapse_blank_lines, html_to_markdown, visit_webpage_definition};
