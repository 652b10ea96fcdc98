use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// A chat message as shown to the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Message ID (client-assigned until the backend reports its own)
    pub id: i64,
    /// ID of the conversation this message belongs to
    pub conversation_id: i64,
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
    /// When the message was created
    pub created_at: DateTime<Utc>,
    /// Whether the message is currently being streamed
    #[serde(default)]
    pub is_streaming: bool,
}

impl Message {
    /// A finished user message.
    pub fn user(id: i64, conversation_id: i64, content: impl Into<String>) -> Self {
        Self {
            id,
            conversation_id,
            role: MessageRole::User,
            content: content.into(),
            created_at: Utc::now(),
            is_streaming: false,
        }
    }

    /// An empty assistant message waiting for streamed content.
    pub fn assistant_placeholder(id: i64, conversation_id: i64) -> Self {
        Self {
            id,
            conversation_id,
            role: MessageRole::Assistant,
            content: String::new(),
            created_at: Utc::now(),
            is_streaming: true,
        }
    }

    /// Append a streamed delta to the content
    pub fn append_token(&mut self, token: &str) {
        self.content.push_str(token);
    }

    /// Mark the message as no longer streaming
    pub fn finalize(&mut self) {
        self.is_streaming = false;
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }
}
