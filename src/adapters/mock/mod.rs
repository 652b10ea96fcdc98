//! Mock implementations for testing.
//!
//! Lets the client and the message sink be exercised without network access.

pub mod transport;

pub use transport::{MockResponse, MockTransport};
