//! Client error types.

use hwv_schema::SchemaError;
use thiserror::Error;

/// Errors that can occur when talking to the survey server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a status the caller cannot act on.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the server.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// Failed to parse a server response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The session schema could not be obtained or compiled.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ClientError {
    /// Whether the server answered 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}
