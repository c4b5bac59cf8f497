use hwv_config::HwvConfig;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::GetArgs;
use crate::output::output;

/// Handle `hwv get`.
pub async fn handle(args: &GetArgs, config: &HwvConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = bootstrap::client(config)?;
    match client.get_single(&args.id).await {
        Ok(submission) => output(&submission, flags.format),
        Err(e) if e.is_not_found() => anyhow::bail!("submission not found: {}", args.id),
        Err(e) => Err(e.into()),
    }
}
