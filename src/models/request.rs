use serde::{Deserialize, Serialize};

/// Model used when the caller does not pick one
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Request body for the streaming chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// Conversation the message is posted to; part of the URL, not the body
    #[serde(skip)]
    pub conversation_id: i64,
    /// The user's message
    pub message: String,
    /// Backend model identifier
    pub model_name: String,
}

impl ChatRequest {
    /// Create a request using the default model
    pub fn new(conversation_id: i64, message: impl Into<String>) -> Self {
        Self {
            conversation_id,
            message: message.into(),
            model_name: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set the model name
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }
}
