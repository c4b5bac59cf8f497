//! Aggregate repository: per-device reads and the all-or-nothing replace.

use chrono::Utc;
use hwv_core::entities::HardwareDisplayModel;
use libsql::TransactionBehavior;

use crate::HwvDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, to_opt_u32, to_u32};

fn row_to_display_model(row: &libsql::Row) -> Result<HardwareDisplayModel, DatabaseError> {
    Ok(HardwareDisplayModel {
        device_id: row.get::<String>(0)?,
        codec: get_opt_string(row, 1)?,
        resolution: get_opt_string(row, 2)?,
        submission_count: to_u32(row.get::<i64>(3)?, "submission_count")?,
        sample_count: to_u32(row.get::<i64>(4)?, "sample_count")?,
        max_streams_min: to_opt_u32(row.get::<Option<i64>>(5)?, "max_streams_min")?,
        max_streams_median: row.get::<Option<f64>>(6)?,
        max_streams_max: to_opt_u32(row.get::<Option<i64>>(7)?, "max_streams_max")?,
        generation: row.get::<i64>(8)?,
    })
}

impl HwvDb {
    /// Current aggregate rows for one device, in the order the pass wrote them.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn aggregates_for_device(
        &self,
        device_id: &str,
    ) -> Result<Vec<HardwareDisplayModel>, DatabaseError> {
        self.query_map(
            "SELECT device_id, codec, resolution, submission_count, sample_count,
                    max_streams_min, max_streams_median, max_streams_max, generation
             FROM hardware_aggregates WHERE device_id = ?1 ORDER BY sort_order",
            [device_id],
            row_to_display_model,
        )
        .await
    }

    /// Generation of the last completed pass, 0 if none has run.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn latest_generation(&self) -> Result<i64, DatabaseError> {
        let generations = self
            .query_map("SELECT COALESCE(MAX(generation), 0) FROM recalc_runs", (), |row| {
                Ok(row.get::<i64>(0)?)
            })
            .await?;
        generations.first().copied().ok_or(DatabaseError::NoResult)
    }

    /// Replace the whole aggregate table with `rows` in one transaction.
    ///
    /// Either every row becomes visible together or, on any failure, the
    /// previous set is left untouched. Holds the gate exclusively, so no other
    /// statement on this connection runs inside the transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any statement fails. The transaction is
    /// rolled back before returning.
    pub async fn replace_aggregate_rows(
        &self,
        generation: i64,
        rows: &[HardwareDisplayModel],
        submissions: usize,
    ) -> Result<(), DatabaseError> {
        let _exclusive = self.exclusive().await;

        // Dropping the transaction unfinished rolls it back, so a cancelled
        // pass cannot leave the connection inside it.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;
        if let Err(e) = write_aggregates(&tx, generation, rows, submissions).await {
            if let Err(rollback) = tx.rollback().await {
                tracing::error!(error = %rollback, "aggregate rollback failed");
            }
            return Err(e);
        }
        tx.commit().await?;
        Ok(())
    }
}

async fn write_aggregates(
    conn: &libsql::Connection,
    generation: i64,
    rows: &[HardwareDisplayModel],
    submissions: usize,
) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM hardware_aggregates", ()).await?;

    for (order, row) in rows.iter().enumerate() {
        let order = i64::try_from(order)
            .map_err(|_| DatabaseError::InvalidState("too many aggregate rows".into()))?;
        conn.execute(
            "INSERT INTO hardware_aggregates (device_id, codec, resolution,
                submission_count, sample_count, max_streams_min, max_streams_median,
                max_streams_max, generation, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            libsql::params![
                row.device_id.as_str(),
                row.codec.as_deref(),
                row.resolution.as_deref(),
                i64::from(row.submission_count),
                i64::from(row.sample_count),
                row.max_streams_min.map(i64::from),
                row.max_streams_median,
                row.max_streams_max.map(i64::from),
                generation,
                order
            ],
        )
        .await?;
    }

    let devices = rows.iter().filter(|row| row.is_summary()).count();
    conn.execute(
        "INSERT INTO recalc_runs (generation, computed_at, submission_count, device_count, row_count)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            generation,
            Utc::now().to_rfc3339(),
            count_to_i64(submissions)?,
            count_to_i64(devices)?,
            count_to_i64(rows.len())?
        ],
    )
    .await?;
    Ok(())
}

fn count_to_i64(n: usize) -> Result<i64, DatabaseError> {
    i64::try_from(n).map_err(|_| DatabaseError::InvalidState(format!("count out of range: {n}")))
}
