//! Conversation domain entities

use crate::tool::entities::ToolCallRequest;
use crate::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};

/// One entry in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum ConversationTurn {
    /// The user's query (always the first turn)
    UserQuery(String),
    /// Free text produced by the model
    ModelText(String),
    /// A batch of tool invocations requested by the model
    ToolCalls(Vec<ToolCallRequest>),
    /// The results for the immediately preceding `ToolCalls` batch
    ToolResults(Vec<ToolResult>),
}

impl ConversationTurn {
    pub fn kind(&self) -> &'static str {
        match self {
            ConversationTurn::UserQuery(_) => "user_query",
            ConversationTurn::ModelText(_) => "model_text",
            ConversationTurn::ToolCalls(_) => "tool_calls",
            ConversationTurn::ToolResults(_) => "tool_results",
        }
    }
}

/// Append-only conversation owned by a single agent loop run.
///
/// Created with the system preamble and the user's query; turns are only
/// ever pushed, never edited or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    preamble: String,
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn new(preamble: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            preamble: preamble.into(),
            turns: vec![ConversationTurn::UserQuery(query.into())],
        }
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn push_model_text(&mut self, text: impl Into<String>) {
        self.push(ConversationTurn::ModelText(text.into()));
    }

    pub fn push_tool_calls(&mut self, requests: Vec<ToolCallRequest>) {
        self.push(ConversationTurn::ToolCalls(requests));
    }

    pub fn push_tool_results(&mut self, results: Vec<ToolResult>) {
        self.push(ConversationTurn::ToolResults(results));
    }

    /// The user's query
    pub fn query(&self) -> Option<&str> {
        self.turns.iter().find_map(|turn| match turn {
            ConversationTurn::UserQuery(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Total number of tool results recorded so far
    pub fn tool_result_count(&self) -> usize {
        self.turns
            .iter()
            .map(|turn| match turn {
                ConversationTurn::ToolResults(results) => results.len(),
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_starts_with_query() {
        let conversation = Conversation::new("You are helpful.", "Any alerts in CA?");

        assert_eq!(conversation.preamble(), "You are helpful.");
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.query(), Some("Any alerts in CA?"));
        assert_eq!(
            conversation.turns()[0],
            ConversationTurn::UserQuery("Any alerts in CA?".into())
        );
    }

    #[test]
    fn test_conversation_appends_in_order() {
        let mut conversation = Conversation::new("", "q");
        conversation.push_tool_calls(vec![ToolCallRequest::new("t1", "get_alerts")]);
        conversation.push_tool_results(vec![ToolResult::success("t1", "get_alerts", "none")]);
        conversation.push_model_text("No alerts.");

        let kinds: Vec<&str> = conversation.turns().iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec!["user_query", "tool_calls", "tool_results", "model_text"]
        );
        assert_eq!(conversation.tool_result_count(), 1);
    }

    #[test]
    fn test_turn_serialization() {
        let turn = ConversationTurn::ModelText("done".into());
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value["type"], "model_text");
        assert_eq!(value["content"], "done");
    }
}
