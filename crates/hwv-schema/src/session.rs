//! Session-scoped schema cache.
//!
//! A session fetches the schema exactly once at start and validates every
//! later document against that copy. There is no refresh: a session that
//! outlives a server-side schema change keeps validating against the schema
//! it started with. Start a new session to pick up a new schema.

use std::sync::Arc;

use hwv_core::validation::ValidationReport;

use crate::document::CompiledSchema;
use crate::error::SchemaError;
use crate::provider::SchemaProvider;
use crate::validator::validate;

/// Read-only schema context owned by one client or server session.
#[derive(Debug, Clone)]
pub struct SchemaSession {
    schema: Arc<CompiledSchema>,
}

impl SchemaSession {
    /// Fetch and compile the schema from `provider`.
    ///
    /// # Errors
    ///
    /// Returns the provider's `SchemaError::Unavailable` unchanged, or
    /// `SchemaError::Invalid` if the document does not compile. Either way
    /// the session has no validation capability and must not start.
    pub async fn initialize<P: SchemaProvider>(provider: &P) -> Result<Self, SchemaError> {
        let document = provider.fetch_schema().await?;
        let schema = document.compile()?;
        tracing::debug!("schema session initialized");
        Ok(Self {
            schema: Arc::new(schema),
        })
    }

    /// Wrap an already compiled schema.
    #[must_use]
    pub const fn from_compiled(schema: Arc<CompiledSchema>) -> Self {
        Self { schema }
    }

    #[must_use]
    pub fn schema(&self) -> &CompiledSchema {
        &self.schema
    }

    /// Shared handle to the compiled schema.
    #[must_use]
    pub fn shared(&self) -> Arc<CompiledSchema> {
        Arc::clone(&self.schema)
    }

    /// Validate `document` against the session's schema.
    #[must_use]
    pub fn validate(&self, document: &str) -> ValidationReport {
        validate(document, &self.schema)
    }
}
