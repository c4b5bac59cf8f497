use hwv_config::HwvConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &HwvConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve(args) => commands::serve::handle(&args, config).await,
        Commands::Schema => commands::schema::handle(config, flags).await,
        Commands::Validate(args) => commands::validate::handle(&args, config, flags).await,
        Commands::Submit(args) => commands::submit::handle(&args, config, flags).await,
        Commands::Get(args) => commands::get::handle(&args, config, flags).await,
        Commands::Device(args) => commands::device::handle(&args, config, flags).await,
        Commands::Recalc => commands::recalc::handle(config, flags).await,
        Commands::List(args) => commands::list::handle(&args, config, flags).await,
    }
}
