//! HTTP request handlers.
//!
//! - [`worker_stats`]: persisted worker statistics and on-demand recompute
//! - [`distance`]: coordinate distance lookup

pub mod distance;
pub mod worker_stats;
