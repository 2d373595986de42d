//! Database repository for worker statistics and complaint counts.

use crate::db::{
    errors::{DbError, Result},
    models::workers::{ComplaintCountRow, WorkerStatsRow, WorkerStatsUpdateDBRequest, non_negative},
};
use crate::stats::models::{ComplaintCounts, WorkerStats};
use crate::types::{WorkerId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Workers<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Workers<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Complaint counts for every worker that has at least one.
    #[instrument(skip(self), err)]
    pub async fn complaint_counts(&mut self) -> Result<ComplaintCounts> {
        let rows = sqlx::query_as::<_, ComplaintCountRow>("SELECT id, complaints FROM workers WHERE complaints > 0")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(rows.into_iter().map(|row| (row.id, non_negative(row.complaints))).collect())
    }

    /// Overwrite the stored statistics of one worker.
    #[instrument(skip(self, request), fields(worker_id = %abbrev_uuid(&id)), err)]
    pub async fn update_stats(&mut self, id: WorkerId, request: &WorkerStatsUpdateDBRequest) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE workers SET
                active_projects = $2,
                completed_projects = $3,
                success_rate = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(request.active_projects)
        .bind(request.completed_projects)
        .bind(request.success_rate)
        .execute(&mut *self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    /// Stored statistics for all workers, ordered by id. Workers that were never aggregated
    /// read as zero counts with a success rate of 100.
    #[instrument(skip(self), err)]
    pub async fn list_stats(&mut self) -> Result<Vec<WorkerStats>> {
        let rows = sqlx::query_as::<_, WorkerStatsRow>(
            r#"
            SELECT
                id,
                COALESCE(active_projects, 0) AS active_projects,
                COALESCE(completed_projects, 0) AS completed_projects,
                COALESCE(success_rate, 100) AS success_rate,
                COALESCE(complaints, 0) AS complaints
            FROM workers
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows.into_iter().map(WorkerStats::from).collect())
    }
}
