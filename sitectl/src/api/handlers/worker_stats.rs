//! Handlers for worker statistics.

use crate::AppState;
use crate::errors::Result;
use crate::stats::{AggregationReport, WorkerStats};
use axum::{Json, extract::State};

/// List the statistics currently stored for every worker, ordered by worker id.
///
/// GET /api/v1/worker-stats
#[tracing::instrument(skip_all)]
pub async fn list_worker_stats(State(state): State<AppState>) -> Result<Json<Vec<WorkerStats>>> {
    let stats = state.stats_reader.list_worker_stats().await?;
    Ok(Json(stats))
}

/// Run a full recompute now and return its report.
///
/// Workers whose write failed are listed in the report; the request itself only fails when the
/// project data could not be fetched.
///
/// POST /api/v1/worker-stats/recompute
#[tracing::instrument(skip_all)]
pub async fn recompute_worker_stats(State(state): State<AppState>) -> Result<Json<AggregationReport>> {
    let report = state.aggregator.run().await?;
    Ok(Json(report))
}
