use hwv_config::HwvConfig;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `hwv schema`.
pub async fn handle(config: &HwvConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = bootstrap::local_schema(config).await?;
    output(session.schema().document(), flags.format)
}
