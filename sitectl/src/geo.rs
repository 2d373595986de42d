//! Great-circle distance between map coordinates.
//!
//! Distances use the haversine formula on a sphere of radius [`EARTH_RADIUS_KM`]. Inputs are
//! degrees and are not range-checked: latitudes outside [-90, 90] or longitudes outside
//! [-180, 180] still produce a finite number, it just isn't a meaningful place on a map.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for all distance calculations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Distance to `other` in kilometres.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        distance_km(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Haversine distance in kilometres between two points given in degrees.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    // Rounding can push `a` a hair past 1 for near-antipodal points, which would make
    // sqrt(1 - a) NaN.
    let a = ((d_lat / 2.0).sin().powi(2) + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2))
        .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Render a distance for display.
///
/// Anything under a kilometre is shown in whole metres ("850 m"), everything else in
/// kilometres with one decimal ("12.5 km"). Both units round halves away from zero, so
/// 2.25 km is "2.3 km". Non-finite values take the kilometre branch.
pub fn format_distance(km: f64) -> String {
    if km.is_finite() && km < 1.0 {
        return format!("{} m", (km * 1000.0).round() as i64);
    }

    // `{:.1}` alone rounds ties to even
    let tenths = (km * 10.0).round() / 10.0;
    let km = if tenths.is_finite() { tenths } else { km };
    format!("{km:.1} km")
}
