use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Invalid session id \"{input}\" (use letters, digits, '-' or '_')")]
    InvalidSessionId { input: String },

    #[error("Session not found: {id}")]
    SessionNotFound { id: String },

    #[error("Failed to write session file {}: {source}", path.display())]
    SessionWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode session: {0}")]
    SessionEncode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
