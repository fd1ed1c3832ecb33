//! Conversation domain module
//!
//! The ordered record of one agent loop run ([`Conversation`]) and the
//! parsed form of a model reply ([`ModelResponse`]).

pub mod entities;
pub mod response;

pub use entities::{Conversation, ConversationTurn};
pub use response::{
    CONTENT_FILTERED_NOTE, ContentBlock, MAX_TOKENS_NOTE, ModelResponse, ResponseParseError,
    StopReason,
};
