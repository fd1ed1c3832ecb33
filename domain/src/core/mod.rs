//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`]: a validated user query, optionally with a target URL

pub mod query;
