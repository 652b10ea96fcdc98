//! Streaming-call error types.
//!
//! Only transport failures abort a streaming call. Malformed or
//! unrecognized payloads are recovered inside the reassembly core and never
//! show up here.

use thiserror::Error;

use super::transport::TransportError;

/// Fatal failure of one streaming call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The stream could not be opened at all.
    #[error("Stream could not be opened: {0}")]
    OpenFailed(#[source] TransportError),

    /// The raw source failed after the stream was opened.
    #[error("Stream connection lost: {0}")]
    ConnectionLost(#[source] TransportError),
}

impl StreamError {
    /// The underlying transport failure.
    pub fn transport(&self) -> &TransportError {
        match self {
            StreamError::OpenFailed(e) | StreamError::ConnectionLost(e) => e,
        }
    }

    /// Check if a fresh call could succeed. Never used for automatic retries.
    pub fn is_retryable(&self) -> bool {
        self.transport().is_retryable()
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::OpenFailed(TransportError::Status { status, .. }) => {
                format!("The chat service rejected the request (HTTP {}).", status)
            }
            StreamError::OpenFailed(_) => {
                "Could not connect to the chat service. Please try again.".to_string()
            }
            StreamError::ConnectionLost(_) => {
                "The reply was interrupted. Partial text has been kept.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::OpenFailed(_) => "E_STREAM_OPEN",
            StreamError::ConnectionLost(_) => "E_STREAM_CONN",
        }
    }
}

impl From<TransportError> for StreamError {
    fn from(err: TransportError) -> Self {
        StreamError::ConnectionLost(err)
    }
}
