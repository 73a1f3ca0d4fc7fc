//! Transport error types.

use thiserror::Error;

pub type TransportResult<T> = Result<T, TransportError>;

/// Errors from the upload/download transport.
///
/// Callers surface all of these identically as a single "processing failed"
/// condition; the variants exist for logging only.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("server returned {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
