use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An accepted survey document. Created once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HardwareSurveySubmission {
    /// GUID text assigned at accept time.
    pub id: String,
    /// The submitted document exactly as parsed.
    pub payload: serde_json::Value,
    /// Grouping key extracted from the payload, if it carried one.
    pub device_key: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Monotonic creation order.
    pub seq: i64,
}
