//! Aggregate recalculation configuration.

use hwv_core::enums::RecalcPolicy;
use hwv_core::survey::DEFAULT_DEVICE_KEY_POINTER;
use serde::{Deserialize, Serialize};

fn default_device_key_pointer() -> String {
    DEFAULT_DEVICE_KEY_POINTER.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecalcConfig {
    /// Behaviour of a trigger that arrives while a pass is running.
    #[serde(default)]
    pub policy: RecalcPolicy,

    /// Seconds between scheduled passes run by the server. 0 disables the timer.
    #[serde(default)]
    pub interval_secs: u64,

    /// JSON pointer of the device grouping key inside each payload.
    #[serde(default = "default_device_key_pointer")]
    pub device_key_pointer: String,
}

impl Default for RecalcConfig {
    fn default() -> Self {
        Self {
            policy: RecalcPolicy::default(),
            interval_secs: 0,
            device_key_pointer: default_device_key_pointer(),
        }
    }
}

impl RecalcConfig {
    #[must_use]
    pub const fn is_scheduled(&self) -> bool {
        self.interval_secs > 0
    }
}
