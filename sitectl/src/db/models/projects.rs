//! Database models for projects and their worker assignments.

use crate::stats::models::Project;
use crate::stats::status::ProjectStatus;
use crate::types::{ProjectId, WorkerId};
use sqlx::FromRow;

/// A project row with its assignments aggregated into an array.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectWithWorkersRow {
    pub id: ProjectId,
    /// Free-text label as stored by the backend; NULL reads as an empty, unrecognized label
    pub status: Option<String>,
    pub worker_ids: Vec<WorkerId>,
}

impl From<ProjectWithWorkersRow> for Project {
    fn from(row: ProjectWithWorkersRow) -> Self {
        let status = ProjectStatus::from(row.status.unwrap_or_default());
        if !status.is_recognized() {
            tracing::warn!(
                project_id = %row.id,
                label = %status,
                workers = row.worker_ids.len(),
                "Project has an unrecognized status, counting it as neither active nor completed"
            );
        }

        Project {
            id: row.id,
            status,
            worker_ids: row.worker_ids,
        }
    }
}
