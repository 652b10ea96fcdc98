//! Transport-level error types.
//!
//! These errors come from the collaborator that owns the raw byte source
//! (HTTP connection, file, stdin). The reassembly core never produces them
//! itself; it only carries them through to the message sink.

use thiserror::Error;

/// Failure reported by a raw chunk source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection to the server could not be established.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Server answered with a non-success status or without a body.
    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Reading the response body failed mid-stream.
    #[error("Read failed: {0}")]
    Read(String),

    /// Local IO error (file or stdin source).
    #[error("IO error: {0}")]
    Io(String),
}

impl TransportError {
    /// Check if a new call has a reasonable chance of succeeding.
    ///
    /// The reassembly core never retries; this only informs the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::ConnectionFailed(_) => true,
            TransportError::Read(_) => true,
            TransportError::Status { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            TransportError::Io(_) => false,
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            TransportError::ConnectionFailed(_) => "E_TRANSPORT_CONN",
            TransportError::Status { .. } => "E_TRANSPORT_STATUS",
            TransportError::Read(_) => "E_TRANSPORT_READ",
            TransportError::Io(_) => "E_TRANSPORT_IO",
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_connect() {
            TransportError::ConnectionFailed(err.to_string())
        } else {
            TransportError::Read(err.to_string())
        }
    }
}
