use serde::{Deserialize, Serialize};

/// Query string of `GET /query` and body of `POST /query`
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    pub query: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct QueryResponse {
    pub query: String,
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct MissingQueryResponse {
    pub message: &'static str,
    pub usage: &'static str,
}

impl Default for MissingQueryResponse {
    fn default() -> Self {
        Self {
            message: "Missing query parameter",
            usage: "Add a query parameter to your request",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: &'static str,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub tools: Vec<String>,
}
