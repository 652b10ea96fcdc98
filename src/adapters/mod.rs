//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestTransport`] - streaming chat calls over HTTP using reqwest
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockTransport`] - scripted chunk lists and failures

pub mod mock;
pub mod reqwest_transport;

pub use mock::MockTransport;
pub use reqwest_transport::ReqwestTransport;
