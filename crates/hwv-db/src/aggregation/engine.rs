//! Serialized recalculation passes.
//!
//! A pass is snapshot, compute, replace. At most one pass runs at a time;
//! what happens to a trigger that arrives meanwhile is decided by the
//! configured [`RecalcPolicy`].

use std::future::Future;
use std::time::Instant;

use hwv_core::entities::{HardwareDisplayModel, HardwareSurveySubmission};
use hwv_core::enums::RecalcPolicy;
use serde::Serialize;
use tokio::sync::Mutex;

use super::stats::compute_display_models;
use crate::HwvDb;
use crate::error::{DatabaseError, ServiceError};

/// Storage seam for the engine.
pub trait AggregateStore: Send + Sync {
    /// All submissions, read consistently in one statement.
    fn snapshot_submissions(
        &self,
    ) -> impl Future<Output = Result<Vec<HardwareSurveySubmission>, DatabaseError>> + Send;

    /// Generation of the last completed pass, 0 if none.
    fn current_generation(&self) -> impl Future<Output = Result<i64, DatabaseError>> + Send;

    /// Atomically swap the whole aggregate set for `rows`.
    fn replace_aggregates(
        &self,
        generation: i64,
        rows: &[HardwareDisplayModel],
        submissions: usize,
    ) -> impl Future<Output = Result<(), DatabaseError>> + Send;
}

impl AggregateStore for HwvDb {
    async fn snapshot_submissions(&self) -> Result<Vec<HardwareSurveySubmission>, DatabaseError> {
        self.all_submissions().await
    }

    async fn current_generation(&self) -> Result<i64, DatabaseError> {
        self.latest_generation().await
    }

    async fn replace_aggregates(
        &self,
        generation: i64,
        rows: &[HardwareDisplayModel],
        submissions: usize,
    ) -> Result<(), DatabaseError> {
        self.replace_aggregate_rows(generation, rows, submissions).await
    }
}

/// What a completed pass wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecalcSummary {
    pub generation: i64,
    pub devices: usize,
    pub rows: usize,
    pub submissions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecalcOutcome {
    Completed(RecalcSummary),
    /// Another pass was running and the policy is `coalesce`.
    Coalesced,
}

/// Runs recalculation passes one at a time.
pub struct RecalcEngine {
    policy: RecalcPolicy,
    running: Mutex<()>,
}

impl RecalcEngine {
    #[must_use]
    pub fn new(policy: RecalcPolicy) -> Self {
        Self {
            policy,
            running: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> RecalcPolicy {
        self.policy
    }

    /// Run one pass against `store`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Aggregation` if the snapshot or the replace
    /// fails. The store's previous aggregates are then still in place.
    pub async fn run<S: AggregateStore>(&self, store: &S) -> Result<RecalcOutcome, ServiceError> {
        let _running = match self.policy {
            RecalcPolicy::Queue => self.running.lock().await,
            RecalcPolicy::Coalesce => {
                if let Ok(guard) = self.running.try_lock() {
                    guard
                } else {
                    tracing::info!("recalculation already running, trigger coalesced");
                    return Ok(RecalcOutcome::Coalesced);
                }
            }
        };

        let started = Instant::now();
        let submissions = store.snapshot_submissions().await.map_err(aggregation_error)?;
        let generation = store.current_generation().await.map_err(aggregation_error)? + 1;
        let rows = compute_display_models(&submissions, generation);

        store
            .replace_aggregates(generation, &rows, submissions.len())
            .await
            .map_err(aggregation_error)?;

        let summary = RecalcSummary {
            generation,
            devices: rows.iter().filter(|row| row.is_summary()).count(),
            rows: rows.len(),
            submissions: submissions.len(),
        };
        tracing::info!(
            generation,
            devices = summary.devices,
            rows = summary.rows,
            submissions = summary.submissions,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "recalculation completed"
        );
        Ok(RecalcOutcome::Completed(summary))
    }
}

fn aggregation_error(e: DatabaseError) -> ServiceError {
    tracing::error!(error = %e, "recalculation failed");
    ServiceError::Aggregation(e.to_string())
}
