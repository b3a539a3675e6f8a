//! Route query and result types, and normalization of backend payloads

use crate::error::{Result, RouteSearchError};
use rutekita_api_client::endpoints::{DijkstraRequest, DijkstraResponse, RouteStep};
use rutekita_geo::{sum_costs, GeoPath, GeoPoint};
use serde::Serialize;

/// Duration estimate used for every route
pub const MINUTES_PER_KM: f64 = 3.0;

/// Both endpoints of a search; only exists once both are chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteQuery {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
}

impl RouteQuery {
    /// Build a query, failing if either endpoint is missing
    pub fn from_endpoints(origin: Option<GeoPoint>, destination: Option<GeoPoint>) -> Result<Self> {
        match (origin, destination) {
            (Some(origin), Some(destination)) => Ok(Self { origin, destination }),
            _ => Err(RouteSearchError::IncompleteSelection),
        }
    }

    /// Wire body for the shortest-path endpoint
    pub fn to_request(&self) -> DijkstraRequest {
        DijkstraRequest::new(self.origin, self.destination)
    }
}

/// One backend leg: coordinates exactly as returned (`[lon, lat]`) and its cost
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    pub lon_lat: Vec<[f64; 2]>,
    pub cost: f64,
}

impl From<&RouteStep> for RouteSegment {
    fn from(step: &RouteStep) -> Self {
        Self {
            lon_lat: step.lon_lat().to_vec(),
            cost: step.cost,
        }
    }
}

/// A computed route with its derived metrics
///
/// Replaced wholesale by every successful computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    /// Sum of segment costs
    pub distance_km: f64,
    /// `round(distance_km * 3)`
    pub duration_minutes: u64,
    /// Backend-reported execution time, unscaled
    pub execution_time_ms: f64,
    /// Display-order path, segment boundaries duplicated
    pub path: GeoPath,
}

impl RouteResult {
    /// Derive a result from backend segments
    pub fn from_segments(segments: &[RouteSegment], execution_time_ms: f64) -> Self {
        let distance_km = sum_costs(segments.iter().map(|s| s.cost));
        let path = GeoPath::from_lon_lat_segments(segments.iter().map(|s| s.lon_lat.iter().copied()));

        Self {
            distance_km,
            duration_minutes: estimate_minutes(distance_km),
            execution_time_ms,
            path,
        }
    }

    /// Validate a backend payload and derive a result from it
    ///
    /// Fails with [`RouteSearchError::Rejected`] for a non-success status and
    /// with [`RouteSearchError::MalformedResponse`] when a success payload
    /// lacks `route` or `execution_time`. Legs without geometry are kept for
    /// their cost and add no points.
    pub fn from_response(response: DijkstraResponse) -> Result<Self> {
        if !response.is_success() {
            return Err(RouteSearchError::Rejected {
                status: response.status,
                message: response.message,
            });
        }

        let steps = response
            .route
            .ok_or_else(|| RouteSearchError::malformed("success response without 'route'"))?;
        let execution_time = response
            .execution_time
            .ok_or_else(|| RouteSearchError::malformed("success response without 'execution_time'"))?;

        let segments: Vec<RouteSegment> = steps.iter().map(RouteSegment::from).collect();
        Ok(Self::from_segments(&segments, execution_time))
    }

    /// True when there is a line to draw
    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Linear travel-time estimate in whole minutes
pub fn estimate_minutes(distance_km: f64) -> u64 {
    // `as` saturates, so a negative sum clamps to zero
    (distance_km * MINUTES_PER_KM).round() as u64
}
