//! Sources of the authoritative submission schema.

use std::future::Future;
use std::path::PathBuf;

use hwv_core::survey::TranscodeSubmission;
use schemars::schema_for;

use crate::document::SchemaDocument;
use crate::error::SchemaError;

/// Supplies the current schema document.
///
/// Callers fetch once per session (see [`crate::SchemaSession`]); providers
/// do not cache.
pub trait SchemaProvider: Send + Sync {
    /// Retrieve the schema document.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Unavailable` when the schema cannot be retrieved.
    fn fetch_schema(&self) -> impl Future<Output = Result<SchemaDocument, SchemaError>> + Send;
}

/// The built-in survey schema, generated from [`TranscodeSubmission`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSchemaProvider;

impl EmbeddedSchemaProvider {
    /// Generate the built-in schema document.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Invalid` if the generated schema cannot be
    /// converted to JSON.
    pub fn document() -> Result<SchemaDocument, SchemaError> {
        serde_json::to_value(schema_for!(TranscodeSubmission))
            .map(SchemaDocument::new)
            .map_err(|e| SchemaError::Invalid(format!("schema generation: {e}")))
    }
}

impl SchemaProvider for EmbeddedSchemaProvider {
    async fn fetch_schema(&self) -> Result<SchemaDocument, SchemaError> {
        Self::document()
    }
}

/// A schema document read from a JSON file.
#[derive(Debug, Clone)]
pub struct FileSchemaProvider {
    path: PathBuf,
}

impl FileSchemaProvider {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SchemaProvider for FileSchemaProvider {
    async fn fetch_schema(&self) -> Result<SchemaDocument, SchemaError> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SchemaError::Unavailable(format!("cannot read {}: {e}", self.path.display()))
        })?;
        tracing::debug!(path = %self.path.display(), "loaded schema file");
        SchemaDocument::from_text(&text)
    }
}
