//! Service layer over the survey store.
//!
//! `SurveyService` wraps `HwvDb` (raw database access), the session's
//! compiled schema (authoritative validation), and the `RecalcEngine`
//! (aggregate recalculation). The HTTP boundary and the CLI only talk to
//! this type.

use hwv_core::entities::{HardwareDisplayModel, HardwareSurveySubmission};
use hwv_core::enums::RecalcPolicy;
use hwv_core::survey::{DEFAULT_DEVICE_KEY_POINTER, extract_device_key};
use hwv_core::validation::ValidationReport;
use hwv_schema::SchemaSession;

use crate::HwvDb;
use crate::aggregation::{RecalcEngine, RecalcOutcome};
use crate::error::{DatabaseError, ServiceError};

/// Tunables for [`SurveyService`].
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub recalc_policy: RecalcPolicy,
    /// JSON pointer of the device grouping key inside a payload.
    pub device_key_pointer: String,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            recalc_policy: RecalcPolicy::default(),
            device_key_pointer: DEFAULT_DEVICE_KEY_POINTER.to_string(),
        }
    }
}

/// Accepts, stores, and aggregates survey submissions.
pub struct SurveyService {
    db: HwvDb,
    schema: SchemaSession,
    engine: RecalcEngine,
    device_key_pointer: String,
}

impl SurveyService {
    /// Create a new service over a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `schema` - The session schema every submission is validated against.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(
        db_path: &str,
        schema: SchemaSession,
        options: ServiceOptions,
    ) -> Result<Self, DatabaseError> {
        let db = HwvDb::open_local(db_path).await?;
        Ok(Self::from_db(db, schema, options))
    }

    /// Create from an existing `HwvDb`.
    #[must_use]
    pub fn from_db(db: HwvDb, schema: SchemaSession, options: ServiceOptions) -> Self {
        Self {
            db,
            schema,
            engine: RecalcEngine::new(options.recalc_policy),
            device_key_pointer: options.device_key_pointer,
        }
    }

    #[must_use]
    pub const fn db(&self) -> &HwvDb {
        &self.db
    }

    #[must_use]
    pub const fn schema(&self) -> &SchemaSession {
        &self.schema
    }

    /// Validate and store a raw survey document.
    ///
    /// Validation here is authoritative regardless of what the client
    /// already checked. Returns the new submission ID.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidSubmission` with the full report if the
    /// document fails validation (nothing is written), or
    /// `ServiceError::Database` if the insert fails.
    pub async fn submit_hardware_survey(&self, raw: &str) -> Result<String, ServiceError> {
        let report = self.schema.validate(raw);
        if !report.is_valid() {
            tracing::warn!(errors = report.errors().len(), "submission rejected");
            return Err(ServiceError::InvalidSubmission(report));
        }

        let payload: serde_json::Value = serde_json::from_str(raw)
            .map_err(|_| ServiceError::InvalidSubmission(ValidationReport::parse_failure()))?;
        let device_key = extract_device_key(&payload, &self.device_key_pointer);

        let stored = self.db.insert_submission(&payload, device_key.as_deref()).await?;
        tracing::info!(id = %stored.id, device = ?device_key, "submission accepted");
        Ok(stored.id)
    }

    /// Look up one submission. IDs match case-insensitively; they are stored
    /// in lowercase.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no submission has this ID.
    pub async fn get_single_submission(
        &self,
        id: &str,
    ) -> Result<HardwareSurveySubmission, ServiceError> {
        self.db
            .get_submission(&id.trim().to_ascii_lowercase())
            .await?
            .ok_or_else(|| ServiceError::NotFound { id: id.to_string() })
    }

    /// Current aggregates for one device. Empty until a pass has covered it.
    ///
    /// Never computes anything: a submission accepted after the last pass is
    /// not reflected until the next recalculation.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Database` if the read fails.
    pub async fn get_submissions(
        &self,
        device_id: &str,
    ) -> Result<Vec<HardwareDisplayModel>, ServiceError> {
        Ok(self.db.aggregates_for_device(device_id.trim()).await?)
    }

    /// Rebuild every device's aggregates from all stored submissions.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Aggregation` if the pass fails; the previous
    /// aggregates remain readable.
    pub async fn recalc_hardware_stats(&self) -> Result<RecalcOutcome, ServiceError> {
        self.engine.run(&self.db).await
    }

    /// Most recent submissions first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Database` if the read fails.
    pub async fn list_submissions(
        &self,
        limit: u32,
    ) -> Result<Vec<HardwareSurveySubmission>, ServiceError> {
        Ok(self.db.list_submissions(limit).await?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Database` if the read fails.
    pub async fn submission_count(&self) -> Result<u64, ServiceError> {
        Ok(self.db.count_submissions().await?)
    }
}

#[cfg(test)]
mod tests {
    use hwv_core::validation::PARSE_FAILURE_MESSAGE;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{arc_survey, test_service, test_service_with};

    #[tokio::test]
    async fn accepted_submission_is_retrievable() {
        let svc = test_service().await;
        let raw = arc_survey(&[("hevc", "2160p", 4)]);

        let id = svc.submit_hardware_survey(&raw).await.unwrap();
        let stored = svc.get_single_submission(&id).await.unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.payload, serde_json::from_str::<serde_json::Value>(&raw).unwrap());
        assert_eq!(stored.device_key.as_deref(), Some("Intel Arc A380"));
        assert!(hwv_core::ids::is_guid(&id));
    }

    #[tokio::test]
    async fn invalid_submission_writes_nothing() {
        let svc = test_service().await;

        let err = svc
            .submit_hardware_survey(r#"{"tests": []}"#)
            .await
            .unwrap_err();
        let ServiceError::InvalidSubmission(report) = err else {
            panic!("expected InvalidSubmission, got {err:?}");
        };
        assert!(report.field_errors().contains_key("deviceId"));
        assert_eq!(svc.submission_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_rejected_with_generic_error() {
        let svc = test_service().await;
        let err = svc.submit_hardware_survey("{ nope").await.unwrap_err();
        let ServiceError::InvalidSubmission(report) = err else {
            panic!("expected InvalidSubmission, got {err:?}");
        };
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].message, PARSE_FAILURE_MESSAGE);
        assert_eq!(svc.submission_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let svc = test_service().await;
        let raw = arc_survey(&[]);
        let a = svc.submit_hardware_survey(&raw).await.unwrap();
        let b = svc.submit_hardware_survey(&raw).await.unwrap();
        assert_ne!(a, b);

        let first = svc.get_single_submission(&a).await.unwrap();
        let second = svc.get_single_submission(&b).await.unwrap();
        assert_eq!(first.payload, second.payload);
        assert_eq!(svc.submission_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn uppercase_id_finds_submission() {
        let svc = test_service().await;
        let id = svc.submit_hardware_survey(&arc_survey(&[])).await.unwrap();

        let stored = svc
            .get_single_submission(&id.to_ascii_uppercase())
            .await
            .unwrap();
        assert_eq!(stored.id, id);
    }

    #[tokio::test]
    async fn resolution_schema_accepts_then_rejects() {
        let schema = hwv_schema::SchemaDocument::from_text(
            r#"{"type":"object","required":["resolution"],"properties":{"resolution":{"type":"string"}}}"#,
        )
        .unwrap()
        .compile()
        .unwrap();
        let svc = SurveyService::from_db(
            HwvDb::open_local(":memory:").await.unwrap(),
            SchemaSession::from_compiled(std::sync::Arc::new(schema)),
            ServiceOptions::default(),
        );

        let id = svc
            .submit_hardware_survey(r#"{"resolution":"1080p"}"#)
            .await
            .unwrap();
        let stored = svc.get_single_submission(&id).await.unwrap();
        assert_eq!(stored.payload, serde_json::json!({"resolution": "1080p"}));

        let err = svc.submit_hardware_survey("{}").await.unwrap_err();
        let ServiceError::InvalidSubmission(report) = err else {
            panic!("expected InvalidSubmission, got {err:?}");
        };
        let fields = report.field_errors();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["resolution"].len(), 1);
        assert_eq!(svc.submission_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn integral_float_stream_counts_are_aggregated() {
        let svc = test_service().await;
        svc.submit_hardware_survey(
            r#"{"deviceId":"arc","tests":[{"codec":"h264","resolution":"1080p","maxStreams":4.0}]}"#,
        )
        .await
        .unwrap();

        svc.recalc_hardware_stats().await.unwrap();
        let rows = svc.get_submissions("arc").await.unwrap();
        let bucket = rows
            .iter()
            .find(|row| row.codec.as_deref() == Some("h264"))
            .unwrap();
        assert_eq!(bucket.max_streams_min, Some(4));
        assert_eq!(bucket.max_streams_median, Some(4.0));
        assert_eq!(bucket.max_streams_max, Some(4));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .get_single_submission("00000000-0000-0000-0000-000000000000")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn reads_reflect_last_pass_only() {
        let svc = test_service().await;
        svc.submit_hardware_survey(&arc_survey(&[("hevc", "2160p", 4)]))
            .await
            .unwrap();
        assert!(svc.get_submissions("Intel Arc A380").await.unwrap().is_empty());

        svc.recalc_hardware_stats().await.unwrap();
        let rows = svc.get_submissions("Intel Arc A380").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].submission_count, 1);

        svc.submit_hardware_survey(&arc_survey(&[("hevc", "2160p", 6)]))
            .await
            .unwrap();
        assert_eq!(
            svc.get_submissions("Intel Arc A380").await.unwrap()[0].submission_count,
            1
        );

        svc.recalc_hardware_stats().await.unwrap();
        let rows = svc.get_submissions("Intel Arc A380").await.unwrap();
        assert_eq!(rows[0].submission_count, 2);
        assert_eq!(rows[1].max_streams_median, Some(5.0));
    }

    #[tokio::test]
    async fn custom_device_key_pointer() {
        let svc = test_service_with(ServiceOptions {
            device_key_pointer: "/os".into(),
            ..ServiceOptions::default()
        })
        .await;
        let id = svc
            .submit_hardware_survey(&arc_survey(&[]))
            .await
            .unwrap();
        let stored = svc.get_single_submission(&id).await.unwrap();
        assert_eq!(stored.device_key.as_deref(), Some("linux"));
    }
}
