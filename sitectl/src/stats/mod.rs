//! Worker statistics: classification, computation, and the recompute run.
//!
//! - [`status`]: the closed set of project statuses and the active/completed subsets
//! - [`aggregate`]: pure per-worker counting and success-rate calculation
//! - [`aggregator`]: [`StatsAggregator`], which fetches, computes, and writes back
//! - [`store`]: the collaborator traits the aggregator depends on
//! - [`scheduler`]: periodic recompute on the leader replica

pub mod aggregate;
pub mod aggregator;
pub mod models;
pub mod scheduler;
pub mod status;
pub mod store;

use crate::db::errors::DbError;
use thiserror::Error;

pub use aggregate::{compute_stats, success_rate};
pub use aggregator::StatsAggregator;
pub use models::{AggregationReport, ComplaintCounts, Project, WorkerStats, WorkerStatsUpdate, WorkerWriteFailure};
pub use scheduler::StatsScheduler;
pub use status::ProjectStatus;
pub use store::{ProjectSource, WorkerStatsReader, WorkerStatsSink};

/// Errors that abort an aggregation run.
///
/// Per-worker write failures are not errors at this level; they are listed in the
/// [`AggregationReport`].
#[derive(Debug, Error)]
pub enum StatsError {
    /// Projects, assignments, or complaint counts could not be read
    #[error("Failed to fetch project data")]
    Fetch(#[source] DbError),
}
