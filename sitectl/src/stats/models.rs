//! Data models for worker statistics.

use crate::stats::status::ProjectStatus;
use crate::types::{ProjectId, WorkerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A project as seen by the aggregator: its status and the workers assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub status: ProjectStatus,
    pub worker_ids: Vec<WorkerId>,
}

/// Complaint counts per worker, tracked outside this crate. Missing workers have none.
pub type ComplaintCounts = HashMap<WorkerId, u32>;

/// Derived statistics for a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStats {
    pub worker_id: WorkerId,
    pub active_count: u32,
    pub completed_count: u32,
    /// Externally supplied, carried through for reporting
    pub complaints: u32,
    /// Always within 0..=100
    pub success_rate: u8,
}

impl WorkerStats {
    /// The fields written back to the worker record.
    pub fn update(&self) -> WorkerStatsUpdate {
        WorkerStatsUpdate {
            active_count: self.active_count,
            completed_count: self.completed_count,
            success_rate: self.success_rate,
        }
    }
}

/// Overwrite payload for a worker's stored statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStatsUpdate {
    pub active_count: u32,
    pub completed_count: u32,
    pub success_rate: u8,
}

/// A worker whose statistics could not be persisted during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerWriteFailure {
    pub worker_id: WorkerId,
    pub error: String,
}

/// Outcome of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationReport {
    /// Number of workers a write was attempted for
    pub processed: usize,
    pub updated: Vec<WorkerId>,
    pub failed: Vec<WorkerWriteFailure>,
    /// Computed statistics in worker id order, whether or not they were persisted
    pub stats: Vec<WorkerStats>,
}

impl AggregationReport {
    /// True when every computed record was persisted.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
