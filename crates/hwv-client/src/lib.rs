//! # hwv-client
//!
//! HTTP client for the hardware survey server.
//!
//! - [`SurveyClient`]: the submission gateway plus lookups and recalculation
//!   triggers. It never validates.
//! - [`RemoteSchemaProvider`]: fetches the server's schema for a session.
//! - [`ClientSession`]: schema fetched once, local validation before submit.
//! - [`EditorValidation`]: the error list and verdict an editor binds to.

mod editor;
mod error;
mod http;
mod provider;
mod session;

pub use editor::{DEFAULT_DOCUMENT, EditorValidation};
pub use error::ClientError;
pub use http::SubmitOutcome;
pub use provider::RemoteSchemaProvider;
pub use session::ClientSession;

use std::time::Duration;

use hwv_config::ClientConfig;
use hwv_core::entities::{HardwareDisplayModel, HardwareSurveySubmission};
use hwv_schema::SchemaDocument;

use crate::http::{check_response, submit_outcome};

/// HTTP client for one survey server.
#[derive(Debug, Clone)]
pub struct SurveyClient {
    http: reqwest::Client,
    base_url: String,
}

impl SurveyClient {
    /// Create a client for the server at `base_url` (without `/api`).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the underlying `reqwest::Client` fails
    /// to build.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("hwv/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    /// `GET /api/submission-schema`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, a non-success status, or
    /// a body that is not JSON.
    pub async fn fetch_schema(&self) -> Result<SchemaDocument, ClientError> {
        let resp = check_response(self.http.get(self.url("submission-schema")).send().await?).await?;
        let value: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("schema: {e}")))?;
        Ok(SchemaDocument::new(value))
    }

    /// `POST /api/submission` with the document text as-is.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport failures and any status other
    /// than 200 or a field-error 400.
    pub async fn submit(&self, document: &str) -> Result<SubmitOutcome, ClientError> {
        let resp = self
            .http
            .post(self.url("submission"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(document.to_string())
            .send()
            .await?;
        let outcome = submit_outcome(resp).await?;
        match &outcome {
            SubmitOutcome::Accepted(id) => tracing::info!(%id, "submission accepted"),
            SubmitOutcome::Rejected(errors) => {
                tracing::warn!(errors = errors.len(), "submission rejected by server");
            }
            SubmitOutcome::Invalid(_) => {}
        }
        Ok(outcome)
    }

    /// `GET /api/submission/single?id=..`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api { status: 404, .. }` for an unknown ID.
    pub async fn get_single(&self, id: &str) -> Result<HardwareSurveySubmission, ClientError> {
        let url = format!("{}?id={}", self.url("submission/single"), urlencoding::encode(id));
        let resp = check_response(self.http.get(&url).send().await?).await?;
        resp.json()
            .await
            .map_err(|e| ClientError::Parse(format!("submission: {e}")))
    }

    /// `GET /api/submission?deviceId=..`. Empty when nothing is aggregated.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a non-success status.
    pub async fn device_models(
        &self,
        device_id: &str,
    ) -> Result<Vec<HardwareDisplayModel>, ClientError> {
        let url = format!(
            "{}?deviceId={}",
            self.url("submission"),
            urlencoding::encode(device_id)
        );
        let resp = check_response(self.http.get(&url).send().await?).await?;
        resp.json()
            .await
            .map_err(|e| ClientError::Parse(format!("display models: {e}")))
    }

    /// `POST /api/submission/recalc`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api { status: 500, .. }` if the pass failed.
    pub async fn recalc(&self) -> Result<(), ClientError> {
        check_response(self.http.post(self.url("submission/recalc")).send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = SurveyClient::new("http://localhost:5080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5080");
        assert_eq!(client.url("submission"), "http://localhost:5080/api/submission");
    }

    #[test]
    fn from_config_uses_base_url() {
        let config = ClientConfig {
            base_url: "http://survey.internal:9000".into(),
            timeout_secs: 3,
        };
        let client = SurveyClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://survey.internal:9000");
    }
}
