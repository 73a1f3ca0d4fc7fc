//! Session error types.

use thiserror::Error;

use pitchside_models::UploadError;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a processing session is already active")]
    SessionActive,

    #[error("file rejected: {0}")]
    Rejected(#[from] UploadError),
}
