//! Schema provider backed by the server's schema endpoint.

use hwv_schema::{SchemaDocument, SchemaError, SchemaProvider};

use crate::SurveyClient;

/// Fetches the schema with `GET /api/submission-schema`.
#[derive(Debug, Clone)]
pub struct RemoteSchemaProvider {
    client: SurveyClient,
}

impl RemoteSchemaProvider {
    #[must_use]
    pub const fn new(client: SurveyClient) -> Self {
        Self { client }
    }
}

impl SchemaProvider for RemoteSchemaProvider {
    async fn fetch_schema(&self) -> Result<SchemaDocument, SchemaError> {
        self.client.fetch_schema().await.map_err(|e| {
            tracing::warn!(error = %e, url = self.client.base_url(), "schema fetch failed");
            SchemaError::Unavailable(e.to_string())
        })
    }
}
