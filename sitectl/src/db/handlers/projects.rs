//! Database repository for projects and their worker assignments.

use crate::db::{errors::Result, models::projects::ProjectWithWorkersRow};
use crate::stats::models::Project;
use sqlx::PgConnection;
use tracing::instrument;

pub struct Projects<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Projects<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// All projects with their distinct assigned workers, ordered by project id. Status labels
    /// outside the known set come back as [`ProjectStatus::Unrecognized`](crate::stats::ProjectStatus).
    #[instrument(skip(self), err)]
    pub async fn list_with_assignments(&mut self) -> Result<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectWithWorkersRow>(
            r#"
            SELECT
                p.id,
                p.status,
                COALESCE(
                    array_agg(DISTINCT pw.worker_id) FILTER (WHERE pw.worker_id IS NOT NULL),
                    '{}'
                ) AS worker_ids
            FROM projects p
            LEFT JOIN project_workers pw ON pw.project_id = p.id
            GROUP BY p.id, p.status
            ORDER BY p.id
            "#,
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows.into_iter().map(Project::from).collect())
    }
}
