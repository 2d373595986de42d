//! Database models for worker statistics.

use crate::db::errors::DbError;
use crate::stats::models::{WorkerStats, WorkerStatsUpdate};
use crate::types::WorkerId;
use sqlx::FromRow;

/// Stored statistics for a worker. NULL columns are coalesced in the query.
#[derive(Debug, Clone, FromRow)]
pub struct WorkerStatsRow {
    pub id: WorkerId,
    pub active_projects: i32,
    pub completed_projects: i32,
    pub success_rate: i32,
    pub complaints: i32,
}

impl From<WorkerStatsRow> for WorkerStats {
    /// Values written by other tools may be out of range; they are clamped rather than rejected.
    fn from(row: WorkerStatsRow) -> Self {
        Self {
            worker_id: row.id,
            active_count: non_negative(row.active_projects),
            completed_count: non_negative(row.completed_projects),
            complaints: non_negative(row.complaints),
            success_rate: row.success_rate.clamp(0, 100) as u8,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ComplaintCountRow {
    pub id: WorkerId,
    pub complaints: i32,
}

/// Database request for overwriting a worker's statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStatsUpdateDBRequest {
    pub active_projects: i32,
    pub completed_projects: i32,
    pub success_rate: i32,
}

impl TryFrom<&WorkerStatsUpdate> for WorkerStatsUpdateDBRequest {
    type Error = DbError;

    fn try_from(update: &WorkerStatsUpdate) -> Result<Self, Self::Error> {
        Ok(Self {
            active_projects: to_column("active_projects", update.active_count)?,
            completed_projects: to_column("completed_projects", update.completed_count)?,
            success_rate: i32::from(update.success_rate),
        })
    }
}

pub(crate) fn non_negative(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn to_column(column: &'static str, value: u32) -> Result<i32, DbError> {
    i32::try_from(value).map_err(|_| DbError::OutOfRange {
        column,
        value: i64::from(value),
    })
}
