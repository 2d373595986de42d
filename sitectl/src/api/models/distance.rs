use serde::{Deserialize, Serialize};

/// Two coordinates in decimal degrees. Values are not range checked; out-of-range latitudes and
/// longitudes still produce a finite distance.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct DistanceQuery {
    pub lat1: f64,
    pub lng1: f64,
    pub lat2: f64,
    pub lng2: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DistanceResponse {
    /// Great-circle distance in kilometres
    pub km: f64,
    /// Human-readable distance, e.g. "850 m" or "12.5 km"
    pub formatted: String,
}
