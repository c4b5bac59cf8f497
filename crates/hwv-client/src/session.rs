//! Client-side session: one schema fetch, local validation, then submit.

use hwv_core::validation::ValidationReport;
use hwv_schema::SchemaSession;

use crate::error::ClientError;
use crate::http::SubmitOutcome;
use crate::provider::RemoteSchemaProvider;
use crate::SurveyClient;

/// A client paired with the schema it fetched at start.
///
/// The schema is never refreshed; start a new session to pick up a changed
/// server schema.
#[derive(Debug, Clone)]
pub struct ClientSession {
    client: SurveyClient,
    schema: SchemaSession,
}

impl ClientSession {
    /// Fetch the server's schema and start a session.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Schema` if the schema is unavailable or does not
    /// compile. No session exists in that case.
    pub async fn start(client: SurveyClient) -> Result<Self, ClientError> {
        let schema = SchemaSession::initialize(&RemoteSchemaProvider::new(client.clone())).await?;
        Ok(Self { client, schema })
    }

    /// Pair a client with an already initialized schema.
    #[must_use]
    pub const fn with_schema(client: SurveyClient, schema: SchemaSession) -> Self {
        Self { client, schema }
    }

    #[must_use]
    pub const fn client(&self) -> &SurveyClient {
        &self.client
    }

    #[must_use]
    pub const fn schema(&self) -> &SchemaSession {
        &self.schema
    }

    #[must_use]
    pub fn validate(&self, document: &str) -> ValidationReport {
        self.schema.validate(document)
    }

    /// Validate locally and only send documents that pass.
    ///
    /// # Errors
    ///
    /// Same as [`SurveyClient::submit`].
    pub async fn submit(&self, document: &str) -> Result<SubmitOutcome, ClientError> {
        let report = self.validate(document);
        if !report.is_valid() {
            return Ok(SubmitOutcome::Invalid(report));
        }
        self.client.submit(document).await
    }
}
