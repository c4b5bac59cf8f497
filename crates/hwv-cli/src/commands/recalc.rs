use hwv_config::HwvConfig;
use serde_json::json;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `hwv recalc`.
pub async fn handle(config: &HwvConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    bootstrap::client(config)?.recalc().await?;
    output(&json!({ "recalculated": true }), flags.format)
}
