//! Coordinate and route geometry helpers for RuteKita.
//!
//! This crate provides:
//! - [`GeoPoint`], the `(latitude, longitude)` value used everywhere in the UI
//! - Axis order conversion from the backend's GeoJSON `[lon, lat]` pairs
//! - [`GeoPath`] reconstruction from per-segment coordinate lists
//! - Cost aggregation, path length and bounding boxes
//!
//! # Example
//!
//! ```
//! use rutekita_geo::{GeoPath, GeoPoint};
//!
//! let segments = vec![
//!     vec![[106.81, -6.26], [106.82, -6.27]],
//!     vec![[106.82, -6.27], [106.83, -6.28]],
//! ];
//! let path = GeoPath::from_lon_lat_segments(segments);
//!
//! assert_eq!(path.len(), 4);
//! assert_eq!(path.points()[0], GeoPoint::new(-6.26, 106.81));
//! ```

mod error;
mod haversine;
pub mod path;

pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::{haversine_distance, EARTH_RADIUS_KM};
pub use path::{sum_costs, Bounds, GeoPath};

use std::fmt;
use std::str::FromStr;

/// A geographic point in display order: latitude first, longitude second.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a new point without range checks.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a new point, rejecting values outside the valid ranges.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let point = Self::new(latitude, longitude);
        if point.is_valid() {
            Ok(point)
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "latitude {latitude} / longitude {longitude} out of range"
            )))
        }
    }

    /// Builds a point from a GeoJSON `[longitude, latitude]` pair.
    #[inline]
    pub const fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    /// Returns the GeoJSON `[longitude, latitude]` pair for this point.
    #[inline]
    pub const fn to_lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Returns true if both axes are finite and inside their ranges.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Human-readable label with both axes rounded to 4 decimal places.
    pub fn label(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

impl FromStr for GeoPoint {
    type Err = GeoError;

    /// Parses `LAT,LON` (whitespace around either value is ignored).
    fn from_str(s: &str) -> Result<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| GeoError::InvalidFormat(s.to_string()))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| GeoError::InvalidFormat(s.to_string()))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| GeoError::InvalidFormat(s.to_string()))?;
        Self::try_new(lat, lon)
    }
}
