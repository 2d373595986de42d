//! Pure computation of per-worker statistics.

use crate::stats::models::{ComplaintCounts, Project, WorkerStats};
use crate::types::WorkerId;
use std::collections::BTreeMap;

/// Success rate in percent for a worker with `completed` finished projects and `complaints`
/// complaints.
///
/// A worker without completed projects is rated 100. Otherwise the share of completed projects
/// not offset by a complaint, clamped to 0..=100 and rounded half away from zero.
pub fn success_rate(completed: u32, complaints: u32) -> u8 {
    if completed == 0 {
        return 100;
    }

    let completed = f64::from(completed);
    let rate = ((completed - f64::from(complaints)) / completed) * 100.0;

    rate.clamp(0.0, 100.0).round() as u8
}

#[derive(Default)]
struct Counters {
    active: u32,
    completed: u32,
}

/// Compute statistics for every worker assigned to at least one project.
///
/// Each (project, worker) pair is counted independently against the active and completed
/// sets, so a worker on two active projects gets an active count of two. Workers that only
/// appear in `complaints` are not part of the result.
pub fn compute_stats(projects: &[Project], complaints: &ComplaintCounts) -> BTreeMap<WorkerId, WorkerStats> {
    let mut counters: BTreeMap<WorkerId, Counters> = BTreeMap::new();

    for project in projects {
        let is_active = project.status.is_active();
        let is_completed = project.status.is_completed();

        for worker_id in &project.worker_ids {
            let entry = counters.entry(*worker_id).or_default();
            if is_active {
                entry.active += 1;
            }
            if is_completed {
                entry.completed += 1;
            }
        }
    }

    counters
        .into_iter()
        .map(|(worker_id, counts)| {
            let complaints = complaints.get(&worker_id).copied().unwrap_or(0);
            let stats = WorkerStats {
                worker_id,
                active_count: counts.active,
                completed_count: counts.completed,
                complaints,
                success_rate: success_rate(counts.completed, complaints),
            };
            (worker_id, stats)
        })
        .collect()
}
