//! Mock chat transport for testing.
//!
//! Replays scripted chunk lists, fails mid-stream, or refuses to open, and
//! records every request it receives.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::TransportError;
use crate::models::ChatRequest;
use crate::traits::{ByteStream, ChatTransport};

/// Configuration for one mocked call.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Deliver these chunks, then end the stream
    Stream(Vec<Bytes>),
    /// Deliver these chunks, then fail with the error
    StreamThenError(Vec<Bytes>, TransportError),
    /// Fail before any byte is delivered
    OpenError(TransportError),
}

impl MockResponse {
    /// A stream delivering each string as one chunk.
    pub fn chunks<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockResponse::Stream(
            parts
                .into_iter()
                .map(|p| Bytes::from(Into::<String>::into(p)))
                .collect(),
        )
    }
}

/// Mock transport for testing.
///
/// Queued responses are consumed one per call, in order. Once the queue is
/// empty the default response (if any) answers every call.
///
/// # Example
///
/// ```ignore
/// use chatstream::adapters::mock::{MockResponse, MockTransport};
///
/// let transport = MockTransport::new();
/// transport.push_response(MockResponse::chunks([
///     "data: {\"content\":\"Hi\"}\n\n",
///     "data: [DONE]\n\n",
/// ]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unanswered call.
    pub fn push_response(&self, response: MockResponse) {
        lock(&self.responses).push_back(response);
    }

    /// Set the response used once the queue is empty.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<ChatRequest> {
        lock(&self.requests).clone()
    }

    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    fn next_response(&self) -> Option<MockResponse> {
        lock(&self.responses)
            .pop_front()
            .or_else(|| lock(&self.default_response).clone())
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, TransportError> {
        lock(&self.requests).push(request.clone());

        match self.next_response() {
            Some(MockResponse::Stream(chunks)) => {
                let items = chunks.into_iter().map(Ok::<Bytes, TransportError>);
                Ok(Box::pin(futures::stream::iter(items)))
            }
            Some(MockResponse::StreamThenError(chunks, err)) => {
                let items = chunks.into_iter().map(Ok).chain(std::iter::once(Err(err)));
                Ok(Box::pin(futures::stream::iter(items)))
            }
            Some(MockResponse::OpenError(err)) => Err(err),
            None => Err(TransportError::ConnectionFailed(format!(
                "No mock response for conversation {}",
                request.conversation_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_stream_chunks_in_order() {
        let transport = MockTransport::new();
        transport.push_response(MockResponse::chunks(["one", "two"]));

        let stream = transport
            .open_stream(&ChatRequest::new(1, "hi"))
            .await
            .unwrap();
        let chunks: Vec<_> = stream.map(|c| c.unwrap()).collect().await;

        assert_eq!(chunks, vec![Bytes::from("one"), Bytes::from("two")]);
        assert_eq!(transport.get_requests().len(), 1);
        assert_eq!(transport.get_requests()[0].message, "hi");
    }

    #[tokio::test]
    async fn test_stream_then_error() {
        let transport = MockTransport::new();
        transport.push_response(MockResponse::StreamThenError(
            vec![Bytes::from("partial")],
            TransportError::Read("reset".to_string()),
        ));

        let stream = transport
            .open_stream(&ChatRequest::new(1, "hi"))
            .await
            .unwrap();
        let items: Vec<_> = stream.collect().await;

        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert_eq!(items[1], Err(TransportError::Read("reset".to_string())));
    }

    #[tokio::test]
    async fn test_queue_then_default() {
        let transport = MockTransport::new();
        transport.push_response(MockResponse::OpenError(TransportError::Status {
            status: 503,
            message: "busy".to_string(),
        }));
        transport.set_default_response(MockResponse::chunks(["ok"]));

        let request = ChatRequest::new(1, "hi");
        assert!(transport.open_stream(&request).await.is_err());
        assert!(transport.open_stream(&request).await.is_ok());
        assert!(transport.open_stream(&request).await.is_ok());
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let transport = MockTransport::new();
        let result = transport.open_stream(&ChatRequest::new(4, "hi")).await;
        assert!(matches!(result, Err(TransportError::ConnectionFailed(_))));

        transport.clear_requests();
        assert!(transport.get_requests().is_empty());
    }
}
