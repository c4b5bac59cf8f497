//! Server error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be opened.
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
