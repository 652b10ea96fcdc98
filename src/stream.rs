//! Delta sequences over raw chunk sources.
//!
//! Two front ends drive the same [`Reassembler`]:
//! - [`Deltas`] - a blocking iterator over a pull-based [`ChunkSource`]
//! - [`delta_stream`] - an async `Stream` over any byte stream, such as a
//!   reqwest response body
//!
//! Both release the underlying source as soon as the sequence terminates
//! (sentinel, end of input, or transport failure). Dropping either one
//! early releases it too.

use std::io::Read;
use std::iter::FusedIterator;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use tracing::warn;

use crate::error::{StreamError, TransportError};
use crate::sse::{Reassembler, Step};

/// Default read size for blocking sources.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Boxed async sequence of text deltas.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, StreamError>> + Send>>;

/// A pull-based source of raw chunks.
///
/// `Ok(None)` signals end of stream.
pub trait ChunkSource {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError>;
}

/// Chunk source over any blocking reader (file, stdin, socket).
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            buf: vec![0; chunk_size.max(1)],
        }
    }
}

impl<R: Read> ChunkSource for ReaderSource<R> {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => return Ok(None),
                Ok(n) => return Ok(Some(Bytes::copy_from_slice(&self.buf[..n]))),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Chunk source over an iterator of chunk results.
#[derive(Debug)]
pub struct IterSource<I>(I);

impl<I> IterSource<I>
where
    I: Iterator<Item = Result<Bytes, TransportError>>,
{
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self(iter.into_iter())
    }
}

impl<I> ChunkSource for IterSource<I>
where
    I: Iterator<Item = Result<Bytes, TransportError>>,
{
    fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        self.0.next().transpose()
    }
}

/// Blocking, non-restartable sequence of deltas for one streaming call.
///
/// Yields `Ok(delta)` for every non-empty delta, at most one `Err` for a
/// transport failure, then `None` forever.
#[derive(Debug)]
pub struct Deltas<S> {
    /// Dropped as soon as the sequence terminates
    source: Option<S>,
    engine: Reassembler,
}

impl<S: ChunkSource> Deltas<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
            engine: Reassembler::new(),
        }
    }

    /// Text accumulated so far.
    pub fn accumulated(&self) -> &str {
        self.engine.accumulated()
    }

    /// Whether the underlying source is still held.
    pub fn holds_source(&self) -> bool {
        self.source.is_some()
    }
}

impl<S: ChunkSource> Iterator for Deltas<S> {
    type Item = Result<String, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.engine.next_step() {
                Step::Delta(delta) => return Some(Ok(delta)),
                Step::Finished => {
                    self.source = None;
                    return None;
                }
                Step::NeedInput => {
                    let Some(source) = self.source.as_mut() else {
                        self.engine.finish_input();
                        continue;
                    };
                    match source.next_chunk() {
                        Ok(Some(chunk)) => self.engine.push_chunk(&chunk),
                        Ok(None) => {
                            self.source = None;
                            self.engine.finish_input();
                        }
                        Err(e) => {
                            warn!(code = e.error_code(), error = %e, "Stream read failed");
                            self.source = None;
                            self.engine.abort();
                            return Some(Err(StreamError::ConnectionLost(e)));
                        }
                    }
                }
            }
        }
    }
}

impl<S: ChunkSource> FusedIterator for Deltas<S> {}

/// Build an async delta sequence over a byte stream.
///
/// The byte stream is polled only when no complete frame is buffered.
pub fn delta_stream<S, E>(source: S) -> DeltaStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<TransportError> + Send + 'static,
{
    let source = Box::pin(source);
    let deltas = stream::unfold(
        (Some(source), Reassembler::new()),
        |(mut source, mut engine)| async move {
            loop {
                match engine.next_step() {
                    Step::Delta(delta) => return Some((Ok(delta), (source, engine))),
                    Step::Finished => return None,
                    Step::NeedInput => {
                        let Some(bytes) = source.as_mut() else {
                            engine.finish_input();
                            continue;
                        };
                        match bytes.next().await {
                            Some(Ok(chunk)) => engine.push_chunk(&chunk),
                            Some(Err(e)) => {
                                let e: TransportError = e.into();
                                warn!(code = e.error_code(), error = %e, "Stream read failed");
                                engine.abort();
                                return Some((Err(StreamError::ConnectionLost(e)), (None, engine)));
                            }
                            None => {
                                source = None;
                                engine.finish_input();
                            }
                        }
                    }
                }
            }
        },
    );
    Box::pin(deltas)
}
