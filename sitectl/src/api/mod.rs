//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures
//!
//! # API Structure
//!
//! Everything is mounted under `/api/v1`:
//!
//! - **Worker statistics** (`/worker-stats`): list persisted statistics, trigger a recompute
//! - **Distance** (`/distance`): great-circle distance between two coordinates
//!
//! There is no authentication layer; the service is meant to run behind the backend's gateway.

use crate::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub mod handlers;
pub mod models;

/// Routes relative to `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/worker-stats", get(handlers::worker_stats::list_worker_stats))
        .route("/worker-stats/recompute", post(handlers::worker_stats::recompute_worker_stats))
        .route("/distance", get(handlers::distance::get_distance))
}
