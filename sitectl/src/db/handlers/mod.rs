//! Repository implementations for database access.
//!
//! Repositories wrap a single SQLx connection and expose strongly-typed queries returning
//! domain models from [`crate::stats::models`]:
//!
//! - [`Projects`]: projects with their worker assignments
//! - [`Workers`]: complaint counts, stored statistics, and statistics updates
//!
//! [`PostgresStatsStore`] owns the pool and implements the aggregator's collaborator traits on
//! top of the repositories.

pub mod projects;
pub mod store;
pub mod workers;

pub use projects::Projects;
pub use store::PostgresStatsStore;
pub use workers::Workers;
