//! Error types for streaming chat calls.
//!
//! | Kind | Where it is handled | Surfaced |
//! |------|---------------------|----------|
//! | Transport failure | aborts the call, sink appends a marker | Yes |
//! | Malformed payload | decoded as plain text | No |
//! | Unrecognized payload shape | fragment dropped | No |
//!
//! Only the first kind has a type; the other two are recovered inside
//! [`crate::sse`].

mod stream;
mod transport;

pub use stream::StreamError;
pub use transport::TransportError;
