//! Conversation state and the message sink that streamed deltas land in.
//!
//! A turn starts with an optimistic user message plus an empty assistant
//! message. Deltas are only ever appended to that trailing assistant
//! message; earlier text is never rewritten.

use futures_util::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::error::StreamError;
use crate::models::Message;

/// Inline diagnostic appended to a reply whose stream failed.
pub const DEFAULT_ERROR_MARKER: &str = "\n[Error generating reply]";

/// Receiver of a streaming call's output.
pub trait MessageSink {
    /// Append a non-empty delta to the in-progress reply.
    fn append_delta(&mut self, delta: &str);

    /// Record a failed call by appending `marker` to the in-progress reply.
    fn fail_turn(&mut self, marker: &str);

    /// Mark the call finished, whatever its outcome.
    fn finish_turn(&mut self);
}

/// How a streaming call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Sentinel seen or source exhausted
    Completed { appended_bytes: usize },
    /// Transport failure; partial content was kept
    Failed {
        error: StreamError,
        appended_bytes: usize,
    },
}

impl TurnOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TurnOutcome::Completed { .. })
    }

    pub fn appended_bytes(&self) -> usize {
        match self {
            TurnOutcome::Completed { appended_bytes }
            | TurnOutcome::Failed { appended_bytes, .. } => *appended_bytes,
        }
    }
}

/// Ordered messages of one conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: i64,
    messages: Vec<Message>,
    next_message_id: i64,
}

impl Conversation {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            messages: Vec::new(),
            next_message_id: 1,
        }
    }

    /// Build from messages loaded from the backend.
    pub fn with_messages(id: i64, messages: Vec<Message>) -> Self {
        let next_message_id = messages.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        Self {
            id,
            messages,
            next_message_id,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Push the user's message and an empty streaming assistant reply.
    pub fn begin_turn(&mut self, user_text: &str) {
        let user_id = self.allocate_id();
        let reply_id = self.allocate_id();
        self.messages.push(Message::user(user_id, self.id, user_text));
        self.messages
            .push(Message::assistant_placeholder(reply_id, self.id));
    }

    /// The trailing message, if it is an assistant message.
    pub fn trailing_assistant(&self) -> Option<&Message> {
        self.messages.last().filter(|m| m.is_assistant())
    }

    fn trailing_assistant_mut(&mut self) -> Option<&mut Message> {
        self.messages.last_mut().filter(|m| m.is_assistant())
    }

    /// Whether a reply is still streaming.
    pub fn is_streaming(&self) -> bool {
        self.trailing_assistant().is_some_and(|m| m.is_streaming)
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_message_id;
        self.next_message_id += 1;
        id
    }
}

impl MessageSink for Conversation {
    fn append_delta(&mut self, delta: &str) {
        let conversation = self.id;
        match self.trailing_assistant_mut() {
            Some(message) => message.append_token(delta),
            None => debug!(conversation, "No assistant message to append to"),
        }
    }

    fn fail_turn(&mut self, marker: &str) {
        if let Some(message) = self.trailing_assistant_mut() {
            message.append_token(marker);
        }
    }

    fn finish_turn(&mut self) {
        if let Some(message) = self.trailing_assistant_mut() {
            message.finalize();
        }
    }
}

pub(crate) fn record_failure<K: MessageSink + ?Sized>(
    sink: &mut K,
    error: StreamError,
    marker: &str,
    appended_bytes: usize,
) -> TurnOutcome {
    warn!(code = error.error_code(), error = %error, "Streaming call failed");
    sink.fail_turn(marker);
    sink.finish_turn();
    TurnOutcome::Failed {
        error,
        appended_bytes,
    }
}

/// Apply every delta of a blocking sequence to `sink`, in order.
pub fn pump<I, K>(deltas: I, sink: &mut K, marker: &str) -> TurnOutcome
where
    I: IntoIterator<Item = Result<String, StreamError>>,
    K: MessageSink + ?Sized,
{
    let mut appended_bytes = 0;
    for item in deltas {
        match item {
            Ok(delta) => {
                appended_bytes += delta.len();
                sink.append_delta(&delta);
            }
            Err(error) => return record_failure(sink, error, marker, appended_bytes),
        }
    }
    sink.finish_turn();
    TurnOutcome::Completed { appended_bytes }
}

/// Apply every delta of an async sequence to `sink`, in order.
pub async fn pump_stream<S, K>(mut deltas: S, sink: &mut K, marker: &str) -> TurnOutcome
where
    S: Stream<Item = Result<String, StreamError>> + Unpin,
    K: MessageSink + ?Sized,
{
    let mut appended_bytes = 0;
    while let Some(item) = deltas.next().await {
        match item {
            Ok(delta) => {
                appended_bytes += delta.len();
                sink.append_delta(&delta);
            }
            Err(error) => return record_failure(sink, error, marker, appended_bytes),
        }
    }
    sink.finish_turn();
    TurnOutcome::Completed { appended_bytes }
}
