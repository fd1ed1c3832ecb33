//! Correlation of tool-call batches with their results

use super::entities::ToolCallRequest;
use super::value_objects::ToolResult;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A batch of results that does not line up one-to-one with its requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelationError {
    #[error("duplicate tool call id '{0}' in request batch")]
    DuplicateRequestId(String),

    #[error("duplicate result for tool call id '{0}'")]
    DuplicateResultId(String),

    #[error("no result for tool call id '{0}'")]
    MissingResult(String),

    #[error("result for unknown tool call id '{0}'")]
    UnexpectedResult(String),
}

/// Check that a batch of requests carries distinct ids.
pub fn ensure_unique_ids(requests: &[ToolCallRequest]) -> Result<(), CorrelationError> {
    let mut seen = HashSet::with_capacity(requests.len());
    for request in requests {
        if !seen.insert(request.id.as_str()) {
            return Err(CorrelationError::DuplicateRequestId(request.id.clone()));
        }
    }
    Ok(())
}

/// Re-associate results with their requests by id.
///
/// Returns the results reordered to match `requests`. Order of `results`
/// is irrelevant; every request id must map to exactly one result and no
/// result may reference an id outside the batch.
pub fn correlate(
    requests: &[ToolCallRequest],
    results: Vec<ToolResult>,
) -> Result<Vec<ToolResult>, CorrelationError> {
    ensure_unique_ids(requests)?;

    let mut by_id: HashMap<String, ToolResult> = HashMap::with_capacity(results.len());
    for result in results {
        if !requests.iter().any(|r| r.id == result.id) {
            return Err(CorrelationError::UnexpectedResult(result.id));
        }
        if by_id.contains_key(&result.id) {
            return Err(CorrelationError::DuplicateResultId(result.id));
        }
        by_id.insert(result.id.clone(), result);
    }

    requests
        .iter()
        .map(|request| {
            by_id
                .remove(&request.id)
                .ok_or_else(|| CorrelationError::MissingResult(request.id.clone()))
        })
        .collect()
}
