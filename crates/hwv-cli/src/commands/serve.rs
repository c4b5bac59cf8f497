use std::sync::Arc;
use std::time::Duration;

use hwv_config::HwvConfig;
use hwv_server::{HttpServer, spawn_recalc_timer};

use crate::bootstrap;
use crate::cli::root_commands::ServeArgs;

/// Handle `hwv serve`. Runs until Ctrl-C.
pub async fn handle(args: &ServeArgs, config: &HwvConfig) -> anyhow::Result<()> {
    let service = Arc::new(bootstrap::open_service(config).await?);
    let bind = args.bind.as_deref().unwrap_or(&config.server.bind);
    let server = HttpServer::bind(bind)?;

    let timer = config.recalc.is_scheduled().then(|| {
        tracing::info!(interval_secs = config.recalc.interval_secs, "recalculation timer enabled");
        spawn_recalc_timer(
            Arc::clone(&service),
            Duration::from_secs(config.recalc.interval_secs),
        )
    });

    let shutdown = server.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutting down");
            shutdown.shutdown();
        }
    });

    let result = server.run(service).await;
    if let Some(timer) = timer {
        timer.abort();
    }
    result?;
    Ok(())
}
