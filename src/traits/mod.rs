//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`ChatTransport`] - opens the byte stream of a streaming chat call

pub mod transport;

pub use transport::{ByteStream, ChatTransport};
