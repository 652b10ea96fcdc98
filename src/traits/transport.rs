//! Chat transport trait abstraction.
//!
//! The reassembly engine only needs a stream of raw byte chunks. Whatever
//! produces that stream (an HTTP response body, a scripted test double)
//! sits behind [`ChatTransport`].

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

use crate::error::TransportError;
use crate::models::ChatRequest;

/// Raw byte chunks of a streaming response, in arrival order.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Opens streaming chat calls.
///
/// An `Err` from [`open_stream`](ChatTransport::open_stream) means no bytes
/// were received. Errors after that surface as items of the returned stream.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Post `request` and return the response body as a byte stream.
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, TransportError>;
}
