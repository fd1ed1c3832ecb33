//! Query value object

use serde::{Deserialize, Serialize};

/// A user query to be answered by the agent loop (Value Object)
///
/// The text is never blank. An optional URL travels with the query and is
/// handed to the model as context alongside the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    text: String,
    url: Option<String>,
}

impl Query {
    /// Try to create a new query, returning None if the text is blank
    pub fn try_new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self { text, url: None })
        }
    }

    /// Attach a target URL. Blank URLs are ignored.
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Text of the first user turn
    pub fn to_prompt(&self) -> String {
        match &self.url {
            Some(url) => format!("{}\n\nURL: {}", self.text, url),
            None => self.text.clone(),
        }
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
