//! Error types for hwv-db.

use hwv_core::validation::ValidationReport;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors surfaced by [`crate::service::SurveyService`] operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The document failed authoritative validation. Nothing was written.
    #[error("Invalid submission ({} error(s))", .0.errors().len())]
    InvalidSubmission(ValidationReport),

    /// No submission exists with this identifier.
    #[error("Submission not found: {id}")]
    NotFound { id: String },

    /// A recalculation pass could not complete. The previous aggregates stand.
    #[error("Aggregation failed: {0}")]
    Aggregation(String),

    /// Storage failure outside recalculation.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}
