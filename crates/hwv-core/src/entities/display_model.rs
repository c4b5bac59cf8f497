use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Aggregated statistics for one device, derived from all of its submissions.
///
/// A device has exactly one summary row (`codec` and `resolution` both
/// `None`) and one row per `(codec, resolution)` pair its submissions tested.
/// Rows are only ever written by a recalculation pass; `generation` names that
/// pass and is shared by every row it wrote.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HardwareDisplayModel {
    pub device_id: String,
    pub codec: Option<String>,
    pub resolution: Option<String>,
    /// Submissions that contributed to this row.
    pub submission_count: u32,
    /// Test entries that contributed to this row (all of the device's for a summary row).
    pub sample_count: u32,
    pub max_streams_min: Option<u32>,
    pub max_streams_median: Option<f64>,
    pub max_streams_max: Option<u32>,
    pub generation: i64,
}

impl HardwareDisplayModel {
    /// Whether this is the per-device summary row.
    #[must_use]
    pub const fn is_summary(&self) -> bool {
        self.codec.is_none() && self.resolution.is_none()
    }
}
