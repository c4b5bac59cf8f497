//! Schema error types.

use thiserror::Error;

/// Errors from fetching or compiling the submission schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The authoritative schema could not be retrieved.
    #[error("Schema unavailable: {0}")]
    Unavailable(String),

    /// The schema document was retrieved but is not a usable JSON Schema.
    #[error("Invalid schema document: {0}")]
    Invalid(String),

    /// Reading a schema file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
