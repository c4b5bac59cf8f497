use hwv_config::HwvConfig;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::ListArgs;
use crate::output::output;

/// Handle `hwv list`. Reads the local store directly.
pub async fn handle(args: &ListArgs, config: &HwvConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let service = bootstrap::open_service(config).await?;
    let submissions = service.list_submissions(args.limit).await?;
    output(&submissions, flags.format)
}
