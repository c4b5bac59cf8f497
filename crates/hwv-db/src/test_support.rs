//! Shared test utilities for hwv-db tests.

#[cfg(test)]
pub(crate) mod helpers {
    use hwv_schema::{EmbeddedSchemaProvider, SchemaSession};

    use crate::HwvDb;
    use crate::service::{ServiceOptions, SurveyService};

    /// In-memory service validating against the embedded schema.
    pub async fn test_service() -> SurveyService {
        test_service_with(ServiceOptions::default()).await
    }

    pub async fn test_service_with(options: ServiceOptions) -> SurveyService {
        let db = HwvDb::open_local(":memory:").await.unwrap();
        let schema = SchemaSession::initialize(&EmbeddedSchemaProvider)
            .await
            .unwrap();
        SurveyService::from_db(db, schema, options)
    }

    /// A valid survey document for the Arc A380 with the given
    /// `(codec, resolution, maxStreams)` tests.
    pub fn arc_survey(tests: &[(&str, &str, u32)]) -> String {
        let tests: Vec<serde_json::Value> = tests
            .iter()
            .map(|(codec, resolution, streams)| {
                serde_json::json!({"codec": codec, "resolution": resolution, "maxStreams": streams})
            })
            .collect();
        serde_json::json!({
            "deviceId": "Intel Arc A380",
            "os": "linux",
            "tests": tests
        })
        .to_string()
    }
}
