//! Pool-backed implementation of the aggregator's collaborator traits.

use crate::db::{
    errors::Result,
    handlers::{Projects, Workers},
    models::workers::WorkerStatsUpdateDBRequest,
};
use crate::stats::models::{ComplaintCounts, Project, WorkerStats, WorkerStatsUpdate};
use crate::stats::store::{ProjectSource, WorkerStatsReader, WorkerStatsSink};
use crate::types::WorkerId;
use sqlx::PgPool;

/// Reads projects and complaints from, and writes worker statistics to, the backend database.
///
/// Every call checks out its own connection, so concurrent worker writes each get their own.
#[derive(Clone, Debug)]
pub struct PostgresStatsStore {
    pool: PgPool,
}

impl PostgresStatsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProjectSource for PostgresStatsStore {
    async fn fetch_projects(&self) -> Result<Vec<Project>> {
        let mut conn = self.pool.acquire().await?;
        Projects::new(&mut conn).list_with_assignments().await
    }

    async fn fetch_complaint_counts(&self) -> Result<ComplaintCounts> {
        let mut conn = self.pool.acquire().await?;
        Workers::new(&mut conn).complaint_counts().await
    }
}

#[async_trait::async_trait]
impl WorkerStatsSink for PostgresStatsStore {
    async fn update_worker_stats(&self, worker_id: WorkerId, update: &WorkerStatsUpdate) -> Result<()> {
        let request = WorkerStatsUpdateDBRequest::try_from(update)?;
        let mut conn = self.pool.acquire().await?;
        Workers::new(&mut conn).update_stats(worker_id, &request).await
    }
}

#[async_trait::async_trait]
impl WorkerStatsReader for PostgresStatsStore {
    async fn list_worker_stats(&self) -> Result<Vec<WorkerStats>> {
        let mut conn = self.pool.acquire().await?;
        Workers::new(&mut conn).list_stats().await
    }
}

/// These run against a real database: `DATABASE_URL=... cargo test -- --ignored`
#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;
    use crate::stats::{ProjectStatus, StatsAggregator};
    use std::sync::Arc;
    use uuid::Uuid;

    /// Minimal stand-in for the tables the hosted backend owns.
    const BACKEND_SCHEMA: &str = r#"
        CREATE TABLE projects (id uuid PRIMARY KEY, status text);
        CREATE TABLE workers (
            id uuid PRIMARY KEY,
            active_projects int,
            completed_projects int,
            success_rate int,
            complaints int
        );
        CREATE TABLE project_workers (
            project_id uuid REFERENCES projects(id),
            worker_id uuid REFERENCES workers(id)
        );
    "#;

    async fn setup(pool: &PgPool) {
        sqlx::raw_sql(BACKEND_SCHEMA).execute(pool).await.expect("Failed to create schema");
    }

    async fn insert_worker(pool: &PgPool, complaints: Option<i32>) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO workers (id, complaints) VALUES ($1, $2)")
            .bind(id)
            .bind(complaints)
            .execute(pool)
            .await
            .expect("Failed to insert worker");
        id
    }

    async fn insert_project(pool: &PgPool, status: &str, workers: &[Uuid]) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO projects (id, status) VALUES ($1, $2)")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await
            .expect("Failed to insert project");
        for worker in workers {
            sqlx::query("INSERT INTO project_workers (project_id, worker_id) VALUES ($1, $2)")
                .bind(id)
                .bind(worker)
                .execute(pool)
                .await
                .expect("Failed to insert assignment");
        }
        id
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires DATABASE_URL"]
    async fn test_fetch_projects_groups_assignments(pool: PgPool) {
        setup(&pool).await;
        let a = insert_worker(&pool, None).await;
        let b = insert_worker(&pool, None).await;
        let shared = insert_project(&pool, "Archived", &[a, b, a]).await;
        let empty = insert_project(&pool, "Planned", &[]).await;

        let store = PostgresStatsStore::new(pool);
        let projects = store.fetch_projects().await.unwrap();

        assert_eq!(projects.len(), 2);
        let shared = projects.iter().find(|p| p.id == shared).unwrap();
        assert_eq!(shared.status, ProjectStatus::Archived);
        // Duplicate assignment rows collapse
        assert_eq!(shared.worker_ids.len(), 2);
        let empty = projects.iter().find(|p| p.id == empty).unwrap();
        assert!(empty.worker_ids.is_empty());
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires DATABASE_URL"]
    async fn test_unlisted_status_is_fetched_as_unrecognized(pool: PgPool) {
        setup(&pool).await;
        let a = insert_worker(&pool, None).await;
        let id = insert_project(&pool, "Done", &[a]).await;

        let store = PostgresStatsStore::new(pool);
        let projects = store.fetch_projects().await.unwrap();

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, id);
        assert_eq!(projects[0].status, ProjectStatus::Unrecognized("Done".to_string()));
        assert_eq!(projects[0].worker_ids, vec![a]);
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires DATABASE_URL"]
    async fn test_complaint_counts_skip_null_and_zero(pool: PgPool) {
        setup(&pool).await;
        let with = insert_worker(&pool, Some(3)).await;
        insert_worker(&pool, Some(0)).await;
        insert_worker(&pool, None).await;

        let store = PostgresStatsStore::new(pool);
        let complaints = store.fetch_complaint_counts().await.unwrap();

        assert_eq!(complaints, ComplaintCounts::from([(with, 3)]));
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires DATABASE_URL"]
    async fn test_update_missing_worker_is_not_found(pool: PgPool) {
        setup(&pool).await;

        let store = PostgresStatsStore::new(pool);
        let update = WorkerStatsUpdate {
            active_count: 1,
            completed_count: 1,
            success_rate: 100,
        };
        let result = store.update_worker_stats(Uuid::new_v4(), &update).await;

        assert!(matches!(result, Err(DbError::NotFound)));
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires DATABASE_URL"]
    async fn test_full_run_against_postgres(pool: PgPool) {
        setup(&pool).await;
        let a = insert_worker(&pool, Some(2)).await;
        let b = insert_worker(&pool, None).await;
        let idle = insert_worker(&pool, Some(1)).await;
        for _ in 0..10 {
            insert_project(&pool, "Completed", &[a]).await;
        }
        insert_project(&pool, "In Progress", &[a, b]).await;

        let store = Arc::new(PostgresStatsStore::new(pool));
        let report = StatsAggregator::new(store.clone(), store.clone())
            .with_write_concurrency(2)
            .run()
            .await
            .unwrap();
        assert_eq!(report.processed, 2);
        assert!(report.is_complete());

        let stored = store.list_worker_stats().await.unwrap();
        let stored_a = stored.iter().find(|s| s.worker_id == a).unwrap();
        assert_eq!(stored_a.completed_count, 10);
        assert_eq!(stored_a.active_count, 1);
        assert_eq!(stored_a.success_rate, 80);
        assert_eq!(stored_a.complaints, 2);

        let stored_b = stored.iter().find(|s| s.worker_id == b).unwrap();
        assert_eq!(stored_b.active_count, 1);
        assert_eq!(stored_b.success_rate, 100);

        // Untouched rows read back with defaults
        let stored_idle = stored.iter().find(|s| s.worker_id == idle).unwrap();
        assert_eq!(stored_idle.completed_count, 0);
        assert_eq!(stored_idle.success_rate, 100);
    }
}
