//! Handler for coordinate distance lookups.

use crate::api::models::distance::{DistanceQuery, DistanceResponse};
use crate::errors::{Error, Result};
use crate::geo::{Coordinates, format_distance};
use axum::{
    Json,
    extract::{Query, rejection::QueryRejection},
};

/// Great-circle distance between two coordinates.
///
/// GET /api/v1/distance?lat1=..&lng1=..&lat2=..&lng2=..
pub async fn get_distance(query: std::result::Result<Query<DistanceQuery>, QueryRejection>) -> Result<Json<DistanceResponse>> {
    let Query(query) = query.map_err(|e| Error::BadRequest { message: e.body_text() })?;

    for (name, value) in [("lat1", query.lat1), ("lng1", query.lng1), ("lat2", query.lat2), ("lng2", query.lng2)] {
        if !value.is_finite() {
            return Err(Error::BadRequest {
                message: format!("{name} must be a finite number"),
            });
        }
    }

    let from = Coordinates::new(query.lat1, query.lng1);
    let km = from.distance_to(&Coordinates::new(query.lat2, query.lng2));
    Ok(Json(DistanceResponse {
        km,
        formatted: format_distance(km),
    }))
}
