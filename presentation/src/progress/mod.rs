//! Progress reporting for agent loop runs

pub mod reporter;
