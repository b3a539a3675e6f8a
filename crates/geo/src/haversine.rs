//! Haversine distance calculation.
//!
//! Used for display-side geometry only (path length, viewport sizing). Route
//! distances shown to the operator always come from the backend's segment
//! costs.

use crate::GeoPoint;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculates the great-circle distance between two points in kilometers.
///
/// # Example
/// ```
/// use rutekita_geo::{haversine_distance, GeoPoint};
///
/// let depot = GeoPoint::new(-6.2555, 106.8062);
/// let center = GeoPoint::new(-6.2615, 106.8106);
///
/// let distance = haversine_distance(&depot, &center);
/// assert!(distance > 0.7 && distance < 0.9);
/// ```
#[inline]
pub fn haversine_distance(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
