//! Periodic recalculation.

use std::sync::Arc;
use std::time::Duration;

use hwv_db::aggregation::RecalcOutcome;
use hwv_db::service::SurveyService;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Run a recalculation every `period` until the task is aborted.
///
/// The first pass runs one full period after start. A failed pass is logged
/// and the next tick tries again.
pub fn spawn_recalc_timer(service: Arc<SurveyService>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match service.recalc_hardware_stats().await {
                Ok(RecalcOutcome::Completed(summary)) => {
                    tracing::debug!(generation = summary.generation, "scheduled recalculation done");
                }
                Ok(RecalcOutcome::Coalesced) => {
                    tracing::debug!("scheduled recalculation coalesced");
                }
                Err(e) => tracing::warn!(error = %e, "scheduled recalculation failed"),
            }
        }
    })
}
