//! The default survey document shape and payload inspection helpers.
//!
//! `TranscodeSubmission` exists only so the embedded schema can be generated
//! with schemars. Submitted documents are never deserialized into it: they stay
//! `serde_json::Value` and are checked against whatever schema document the
//! server was configured with. The helpers below therefore read payloads
//! defensively and skip anything that does not have the expected shape.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default JSON pointer of the device grouping key.
pub const DEFAULT_DEVICE_KEY_POINTER: &str = "/deviceId";

/// JSON pointer of the capability test array.
pub const TESTS_POINTER: &str = "/tests";

/// A hardware transcoding capability survey, as produced by the survey tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeSubmission {
    /// Stable identifier of the device (GPU, iGPU, or SoC model).
    #[schemars(length(min = 1))]
    pub device_id: String,

    /// Operating system the survey ran on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,

    /// Media server version that ran the survey.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,

    /// Acceleration API in use (e.g. `vaapi`, `qsv`, `nvenc`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_acceleration: Option<String>,

    /// One entry per codec/resolution combination that was tested.
    #[serde(default)]
    pub tests: Vec<TranscodeTest>,
}

/// Result of stress-testing one codec at one resolution.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeTest {
    #[schemars(length(min = 1))]
    pub codec: String,

    /// Output resolution label (e.g. `1080p`, `2160p`).
    #[schemars(length(min = 1))]
    pub resolution: String,

    /// Highest number of concurrent real-time transcodes sustained.
    pub max_streams: u32,

    /// Frames per second reached with a single stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
}

/// One capability sample read out of an untyped payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySample<'a> {
    pub codec: &'a str,
    pub resolution: &'a str,
    pub max_streams: Option<u32>,
}

/// Extract the device grouping key at `pointer`.
///
/// Returns `None` for a missing, non-string, or blank value.
#[must_use]
pub fn extract_device_key(payload: &Value, pointer: &str) -> Option<String> {
    payload
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(String::from)
}

/// Read the capability samples out of a payload.
///
/// Entries lacking a string `codec` or `resolution` are skipped. A missing or
/// out-of-range `maxStreams` yields a sample without a stream figure.
#[must_use]
pub fn capability_samples(payload: &Value) -> Vec<CapabilitySample<'_>> {
    let Some(tests) = payload.pointer(TESTS_POINTER).and_then(Value::as_array) else {
        return Vec::new();
    };

    tests
        .iter()
        .filter_map(|entry| {
            let codec = entry.get("codec")?.as_str()?;
            let resolution = entry.get("resolution")?.as_str()?;
            let max_streams = entry.get("maxStreams").and_then(stream_count);
            Some(CapabilitySample {
                codec,
                resolution,
                max_streams,
            })
        })
        .collect()
}

/// Read a stream count, accepting integral floats such as `4.0`.
fn stream_count(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = value.as_f64()?;
    if f.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&f) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(f as u32)
}
