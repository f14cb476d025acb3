//! Prompt and result types exchanged with the generator
//!
//! A prompt is either a single string or an ordered conversation of
//! role/content pairs. Which of the two a generator accepts depends on the
//! endpoint variant its model was routed to.

use serde::{Deserialize, Serialize};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions that guide the model's behavior
    System,
    /// User input message
    User,
    /// Assistant (model) response
    Assistant,
}

/// A single role/content entry of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Input handed to a generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prompt {
    /// A bare prompt string
    Text(String),
    /// An ordered list of role/content messages
    Conversation(Vec<ChatMessage>),
}

impl Prompt {
    /// Short description of the prompt's shape, used in diagnostics
    pub fn shape(&self) -> &'static str {
        match self {
            Prompt::Text(_) => "string",
            Prompt::Conversation(_) => "list of messages",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Prompt::Text(text) => Some(text),
            Prompt::Conversation(_) => None,
        }
    }
}

impl From<String> for Prompt {
    fn from(value: String) -> Self {
        Prompt::Text(value)
    }
}

impl From<&str> for Prompt {
    fn from(value: &str) -> Self {
        Prompt::Text(value.to_string())
    }
}

impl From<Vec<ChatMessage>> for Prompt {
    fn from(value: Vec<ChatMessage>) -> Self {
        Prompt::Conversation(value)
    }
}

/// Outputs of one generate call, in provider order.
///
/// `None` marks a slot the provider returned no text for, or the single
/// placeholder of a rejected request.
pub type GenerationResult = Vec<Option<String>>;
