//! Test utilities: an in-memory backend and helpers to stand up the HTTP API against it.

use crate::config::{Config, PoolSettings};
use crate::db::errors::{DbError, Result};
use crate::stats::models::{ComplaintCounts, Project, WorkerStats, WorkerStatsUpdate};
use crate::stats::status::ProjectStatus;
use crate::stats::store::{ProjectSource, WorkerStatsReader, WorkerStatsSink};
use crate::stats::StatsAggregator;
use crate::types::WorkerId;
use crate::{AppState, build_router};
use axum_test::TestServer;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Default)]
struct Backend {
    /// complaints and last written stats per worker
    workers: BTreeMap<WorkerId, (u32, Option<WorkerStatsUpdate>)>,
    projects: Vec<Project>,
    failing_writes: HashSet<WorkerId>,
    fail_fetches: bool,
    write_log: Vec<WorkerId>,
}

/// Backend stand-in that behaves like the Postgres store: writes to unknown workers are
/// `NotFound`, complaint counts only include workers with at least one complaint.
#[derive(Default)]
pub struct InMemoryStore {
    backend: Mutex<Backend>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn backend(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().expect("in-memory store poisoned")
    }

    pub fn add_worker(&self, complaints: u32) -> WorkerId {
        let id = Uuid::new_v4();
        self.backend().workers.insert(id, (complaints, None));
        id
    }

    pub fn add_project(&self, status: ProjectStatus, workers: &[WorkerId]) {
        self.backend().projects.push(Project {
            id: Uuid::new_v4(),
            status,
            worker_ids: workers.to_vec(),
        });
    }

    pub fn fail_writes_for(&self, worker_id: WorkerId) {
        self.backend().failing_writes.insert(worker_id);
    }

    pub fn fail_fetches(&self) {
        self.backend().fail_fetches = true;
    }

    /// Last successfully written statistics for the worker
    pub fn stored(&self, worker_id: WorkerId) -> Option<WorkerStatsUpdate> {
        self.backend().workers.get(&worker_id).and_then(|(_, stored)| *stored)
    }

    /// Workers in the order their writes succeeded, across all runs
    pub fn write_log(&self) -> Vec<WorkerId> {
        self.backend().write_log.clone()
    }
}

#[async_trait::async_trait]
impl ProjectSource for InMemoryStore {
    async fn fetch_projects(&self) -> Result<Vec<Project>> {
        let backend = self.backend();
        if backend.fail_fetches {
            return Err(DbError::Other(anyhow::anyhow!("connection refused")));
        }
        Ok(backend.projects.clone())
    }

    async fn fetch_complaint_counts(&self) -> Result<ComplaintCounts> {
        let backend = self.backend();
        if backend.fail_fetches {
            return Err(DbError::Other(anyhow::anyhow!("connection refused")));
        }
        Ok(backend
            .workers
            .iter()
            .filter(|(_, (complaints, _))| *complaints > 0)
            .map(|(id, (complaints, _))| (*id, *complaints))
            .collect())
    }
}

#[async_trait::async_trait]
impl WorkerStatsSink for InMemoryStore {
    async fn update_worker_stats(&self, worker_id: WorkerId, update: &WorkerStatsUpdate) -> Result<()> {
        let mut backend = self.backend();
        if backend.failing_writes.contains(&worker_id) {
            return Err(DbError::Other(anyhow::anyhow!("write rejected for worker {worker_id}")));
        }
        let Some((_, stored)) = backend.workers.get_mut(&worker_id) else {
            return Err(DbError::NotFound);
        };
        *stored = Some(*update);
        backend.write_log.push(worker_id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl WorkerStatsReader for InMemoryStore {
    async fn list_worker_stats(&self) -> Result<Vec<WorkerStats>> {
        let backend = self.backend();
        if backend.fail_fetches {
            return Err(DbError::Other(anyhow::anyhow!("connection refused")));
        }
        Ok(backend
            .workers
            .iter()
            .map(|(id, (complaints, stored))| {
                let stored = stored.unwrap_or(WorkerStatsUpdate {
                    active_count: 0,
                    completed_count: 0,
                    success_rate: 100,
                });
                WorkerStats {
                    worker_id: *id,
                    active_count: stored.active_count,
                    completed_count: stored.completed_count,
                    complaints: *complaints,
                    success_rate: stored.success_rate,
                }
            })
            .collect())
    }
}

pub fn create_test_config() -> Config {
    let mut config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..Default::default()
    };
    config.database.pool = PoolSettings {
        max_connections: 1,
        min_connections: 0,
        ..Default::default()
    };
    config.background_services.stats_scheduler.enabled = false;
    config.background_services.leader_election.enabled = false;
    config
}

/// HTTP API backed by `store`, with no background services running.
pub fn create_test_app(store: Arc<InMemoryStore>) -> TestServer {
    let state = AppState::builder()
        .aggregator(StatsAggregator::new(store.clone(), store.clone()))
        .stats_reader(store)
        .build();

    TestServer::new(build_router(state)).expect("Failed to create test server")
}
