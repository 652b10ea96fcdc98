//! chatstream - reassembles streamed chat replies from Server-Sent Events
//!
//! Raw byte chunks go in; ordered, de-duplicated text deltas come out.
//! Backends that resend the whole reply so far (snapshots) and backends
//! that send only new text (incremental deltas) both produce a plain
//! append-only sequence.
//!
//! This library exposes modules for use by the binary and integration tests.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod models;
pub mod sse;
pub mod stream;
pub mod traits;

pub use client::ChatClient;
pub use config::ChatConfig;
pub use conversation::{pump, pump_stream, Conversation, MessageSink, TurnOutcome};
pub use error::{StreamError, TransportError};
pub use sse::{Reassembler, Step};
pub use stream::{delta_stream, ChunkSource, DeltaStream, Deltas, IterSource, ReaderSource};
