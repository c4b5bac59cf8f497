//! # hwv-db
//!
//! libSQL persistence and the submission service for the hardware survey.
//!
//! Holds the append-only submission store, the derived per-device aggregate
//! table, and the recalculation engine that rebuilds the aggregates from a
//! snapshot of all submissions.
//!
//! One connection is shared by every caller. Statements that run inside the
//! aggregate replacement transaction would otherwise be visible to, or be
//! rolled back together with, unrelated statements on the same connection, so
//! every access goes through a read/write gate: ordinary queries share it,
//! the replacement transaction holds it exclusively.

pub mod aggregation;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use libsql::params::IntoParams;
use tokio::sync::{RwLock, RwLockWriteGuard};

/// Central database handle for the survey store.
pub struct HwvDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    gate: RwLock<()>,
}

impl HwvDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let hwv_db = Self {
            db,
            conn,
            gate: RwLock::new(()),
        };
        hwv_db.run_migrations().await?;
        tracing::debug!(path, "survey database opened");
        Ok(hwv_db)
    }

    /// Access the underlying libSQL connection, bypassing the gate.
    ///
    /// Only for tests and diagnostics.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a submission ID via libSQL: 32 lowercase hex characters.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self) -> Result<String, DatabaseError> {
        let mut ids = self
            .query_map("SELECT lower(hex(randomblob(16)))", (), |row| {
                Ok(row.get::<String>(0)?)
            })
            .await?;
        let raw = ids.pop().ok_or(DatabaseError::NoResult)?;
        hwv_core::ids::format_guid(&raw)
            .ok_or_else(|| DatabaseError::InvalidState(format!("malformed generated id: {raw}")))
    }

    /// Run a query and map every row while holding the shared gate.
    ///
    /// Rows are drained before the gate is released, so a concurrent
    /// replacement transaction never interleaves with a half-read cursor.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query or any row mapping fails.
    pub async fn query_map<T, F>(
        &self,
        sql: &str,
        params: impl IntoParams,
        mut map: F,
    ) -> Result<Vec<T>, DatabaseError>
    where
        F: FnMut(&libsql::Row) -> Result<T, DatabaseError>,
    {
        let _shared = self.gate.read().await;
        let mut rows = self.conn.query(sql, params).await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map(&row)?);
        }
        Ok(out)
    }

    /// Execute a statement while holding the shared gate.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if execution fails.
    pub async fn execute(&self, sql: &str, params: impl IntoParams) -> Result<u64, DatabaseError> {
        let _shared = self.gate.read().await;
        Ok(self.conn.execute(sql, params).await?)
    }

    /// Take the gate exclusively. Held for the span of a write transaction.
    pub(crate) async fn exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().await
    }
}
