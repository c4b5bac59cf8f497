use hwv_config::HwvConfig;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::DeviceArgs;
use crate::output::output;

/// Handle `hwv device`.
pub async fn handle(args: &DeviceArgs, config: &HwvConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let rows = bootstrap::client(config)?.device_models(&args.device_id).await?;
    if rows.is_empty() && !flags.quiet {
        eprintln!("no statistics for '{}' yet (run `hwv recalc` after submitting)", args.device_id);
    }
    output(&rows, flags.format)
}
