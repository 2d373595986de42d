//! API request and response data models.
//!
//! Worker statistics are returned as [`crate::stats::WorkerStats`] and recompute results as
//! [`crate::stats::AggregationReport`]; only the shapes specific to HTTP live here.

pub mod distance;
