//! Collaborator traits the aggregator reads from and writes to.
//!
//! The production implementation is [`crate::db::handlers::PostgresStatsStore`]. Everything is
//! object safe so the HTTP layer and the scheduler can share one store behind an `Arc<dyn _>`.

use crate::db::errors::Result;
use crate::stats::models::{ComplaintCounts, Project, WorkerStats, WorkerStatsUpdate};
use crate::types::WorkerId;

/// Read side: projects with their assignments, and complaint counts.
#[async_trait::async_trait]
pub trait ProjectSource: Send + Sync {
    /// All projects with status and assigned workers
    async fn fetch_projects(&self) -> Result<Vec<Project>>;

    /// Complaint counts per worker
    async fn fetch_complaint_counts(&self) -> Result<ComplaintCounts>;
}

/// Write side: one overwrite per worker.
#[async_trait::async_trait]
pub trait WorkerStatsSink: Send + Sync {
    /// Overwrite the worker's active/completed/success-rate fields
    async fn update_worker_stats(&self, worker_id: WorkerId, update: &WorkerStatsUpdate) -> Result<()>;
}

/// Persisted statistics, as last written.
#[async_trait::async_trait]
pub trait WorkerStatsReader: Send + Sync {
    async fn list_worker_stats(&self) -> Result<Vec<WorkerStats>>;
}
