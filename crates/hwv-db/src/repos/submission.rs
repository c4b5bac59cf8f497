//! Submission repository: append-only insert and lookups.

use chrono::Utc;
use hwv_core::entities::HardwareSurveySubmission;

use crate::HwvDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_json};

const SELECT_COLUMNS: &str = "SELECT id, payload, device_key, created_at, seq FROM hardware_submissions";

fn row_to_submission(row: &libsql::Row) -> Result<HardwareSurveySubmission, DatabaseError> {
    Ok(HardwareSurveySubmission {
        id: row.get::<String>(0)?,
        payload: parse_json(&row.get::<String>(1)?)?,
        device_key: get_opt_string(row, 2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
        seq: row.get::<i64>(4)?,
    })
}

impl HwvDb {
    /// Store an accepted document under a freshly generated ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if ID generation or the insert fails.
    pub async fn insert_submission(
        &self,
        payload: &serde_json::Value,
        device_key: Option<&str>,
    ) -> Result<HardwareSurveySubmission, DatabaseError> {
        let id = self.generate_id().await?;
        let now = Utc::now();
        let text = serde_json::to_string(payload).map_err(|e| DatabaseError::Other(e.into()))?;

        self.execute(
            "INSERT INTO hardware_submissions (id, payload, device_key, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            libsql::params![id.as_str(), text, device_key, now.to_rfc3339()],
        )
        .await?;

        self.get_submission(&id).await?.ok_or(DatabaseError::NoResult)
    }

    /// Look up one submission by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the row is malformed.
    pub async fn get_submission(
        &self,
        id: &str,
    ) -> Result<Option<HardwareSurveySubmission>, DatabaseError> {
        let mut found = self
            .query_map(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id],
                row_to_submission,
            )
            .await?;
        Ok(found.pop())
    }

    /// Most recent submissions first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn list_submissions(
        &self,
        limit: u32,
    ) -> Result<Vec<HardwareSurveySubmission>, DatabaseError> {
        self.query_map(
            &format!("{SELECT_COLUMNS} ORDER BY seq DESC LIMIT ?1"),
            [i64::from(limit)],
            row_to_submission,
        )
        .await
    }

    /// Every submission in creation order, read with a single statement.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn all_submissions(&self) -> Result<Vec<HardwareSurveySubmission>, DatabaseError> {
        self.query_map(
            &format!("{SELECT_COLUMNS} ORDER BY seq ASC"),
            (),
            row_to_submission,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_submissions(&self) -> Result<u64, DatabaseError> {
        let counts = self
            .query_map("SELECT COUNT(*) FROM hardware_submissions", (), |row| {
                Ok(row.get::<i64>(0)?)
            })
            .await?;
        let count = counts.first().copied().ok_or(DatabaseError::NoResult)?;
        u64::try_from(count).map_err(|_| DatabaseError::InvalidState(format!("negative count: {count}")))
    }
}
