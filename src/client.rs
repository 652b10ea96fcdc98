//! Chat client for the streaming chat endpoint.
//!
//! Composes a [`ChatTransport`] with the reassembly engine and a
//! [`MessageSink`]. One call to [`ChatClient::send_message`] is one turn:
//! the user message and an empty reply are added up front, deltas land in
//! the reply as they arrive, and a failure appends the configured marker.

use tracing::{debug, info};

use crate::adapters::ReqwestTransport;
use crate::config::ChatConfig;
use crate::conversation::{pump_stream, record_failure, Conversation, MessageSink, TurnOutcome};
use crate::error::StreamError;
use crate::models::ChatRequest;
use crate::stream::{delta_stream, DeltaStream};
use crate::traits::ChatTransport;

/// Client for streaming chat calls.
pub struct ChatClient<T> {
    transport: T,
    config: ChatConfig,
}

impl ChatClient<ReqwestTransport> {
    /// Create a client that talks HTTP to `config.base_url`.
    pub fn from_config(config: ChatConfig) -> Self {
        let transport = ReqwestTransport::from_config(&config);
        Self::new(transport, config)
    }
}

impl<T: ChatTransport> ChatClient<T> {
    pub fn new(transport: T, config: ChatConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn request(&self, conversation_id: i64, text: &str) -> ChatRequest {
        ChatRequest::new(conversation_id, text).with_model(self.config.model.clone())
    }

    /// Open a streaming call and return its deltas.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::OpenFailed`] when the call could not be opened.
    pub async fn stream_chat(
        &self,
        conversation_id: i64,
        text: &str,
    ) -> Result<DeltaStream, StreamError> {
        let request = self.request(conversation_id, text);
        let bytes = self
            .transport
            .open_stream(&request)
            .await
            .map_err(StreamError::OpenFailed)?;
        debug!(conversation_id, "Chat stream opened");
        Ok(delta_stream(bytes))
    }

    /// Run one streaming call, applying its deltas to `sink`.
    ///
    /// The sink is finished whatever the outcome.
    pub async fn run_turn<K>(&self, conversation_id: i64, text: &str, sink: &mut K) -> TurnOutcome
    where
        K: MessageSink + ?Sized,
    {
        let marker = self.config.error_marker.as_str();
        let outcome = match self.stream_chat(conversation_id, text).await {
            Ok(deltas) => pump_stream(deltas, sink, marker).await,
            Err(error) => record_failure(sink, error, marker, 0),
        };
        info!(
            conversation_id,
            completed = outcome.is_completed(),
            bytes = outcome.appended_bytes(),
            "Chat turn finished"
        );
        outcome
    }

    /// Post `text` to `conversation` and stream the reply into it.
    pub async fn send_message(&self, conversation: &mut Conversation, text: &str) -> TurnOutcome {
        conversation.begin_turn(text);
        let conversation_id = conversation.id;
        self.run_turn(conversation_id, text, conversation).await
    }
}
