//! One full recompute of worker statistics: fetch, compute, write back.

use crate::stats::aggregate::compute_stats;
use crate::stats::models::{AggregationReport, WorkerWriteFailure};
use crate::stats::store::{ProjectSource, WorkerStatsSink};
use crate::stats::StatsError;
use crate::types::abbrev_uuid;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Recomputes statistics for every assigned worker and overwrites the stored values.
///
/// A run either fails before writing anything (the source could not be read) or completes,
/// possibly with some workers listed as failed in the report. Failed writes are not retried;
/// the next run recomputes everything from scratch anyway.
#[derive(Clone)]
pub struct StatsAggregator {
    source: Arc<dyn ProjectSource>,
    sink: Arc<dyn WorkerStatsSink>,
    write_concurrency: usize,
}

impl StatsAggregator {
    /// Create an aggregator that writes one worker at a time.
    pub fn new(source: Arc<dyn ProjectSource>, sink: Arc<dyn WorkerStatsSink>) -> Self {
        Self {
            source,
            sink,
            write_concurrency: 1,
        }
    }

    /// Allow up to `limit` worker writes in flight at once. Zero is treated as one.
    pub fn with_write_concurrency(mut self, limit: usize) -> Self {
        self.write_concurrency = limit.max(1);
        self
    }

    /// Run a full recompute.
    #[instrument(skip(self), fields(write_concurrency = self.write_concurrency), err)]
    pub async fn run(&self) -> Result<AggregationReport, StatsError> {
        let projects = self.source.fetch_projects().await.map_err(StatsError::Fetch)?;
        let complaints = self.source.fetch_complaint_counts().await.map_err(StatsError::Fetch)?;

        info!(
            projects = projects.len(),
            workers_with_complaints = complaints.len(),
            "Fetched project data for worker statistics"
        );

        let stats: Vec<_> = compute_stats(&projects, &complaints).into_values().collect();

        let sink = self.sink.clone();
        // `buffered` yields in input order, so outcomes are handled in worker id order even
        // when several writes are in flight.
        let mut outcomes = futures::stream::iter(stats.clone())
            .map(|entry| {
                let sink = sink.clone();
                async move {
                    let result = sink.update_worker_stats(entry.worker_id, &entry.update()).await;
                    (entry.worker_id, result)
                }
            })
            .buffered(self.write_concurrency);

        let mut report = AggregationReport::default();
        while let Some((worker_id, result)) = outcomes.next().await {
            report.processed += 1;
            match result {
                Ok(()) => {
                    debug!(worker_id = %abbrev_uuid(&worker_id), "Updated worker statistics");
                    report.updated.push(worker_id);
                }
                Err(e) => {
                    warn!(worker_id = %worker_id, error = %e, "Failed to update worker statistics");
                    report.failed.push(WorkerWriteFailure {
                        worker_id,
                        error: e.to_string(),
                    });
                }
            }
        }
        report.stats = stats;

        info!(
            processed = report.processed,
            updated = report.updated.len(),
            failed = report.failed.len(),
            "Worker statistics recomputed"
        );

        Ok(report)
    }
}
