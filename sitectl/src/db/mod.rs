//! Postgres access for the tables the stats aggregator reads and writes.
//!
//! The schema is owned by the hosted backend; this crate ships no migrations and only assumes
//! the following shape:
//!
//! ```text
//! projects        (id uuid, status text)
//! project_workers (project_id uuid, worker_id uuid)
//! workers         (id uuid, active_projects int, completed_projects int,
//!                  success_rate int, complaints int)
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository structs bound to a single connection, plus
//!   [`handlers::PostgresStatsStore`] which implements the aggregator's collaborator traits
//! - [`models`]: Row structures matching the queried columns
//! - [`errors`]: Database-specific error types
//!
//! ```ignore
//! let mut conn = pool.acquire().await?;
//! let projects = Projects::new(&mut conn).list_with_assignments().await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
