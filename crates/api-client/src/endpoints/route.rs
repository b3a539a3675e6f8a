//! Shortest-path endpoint

use crate::client::RoutingClient;
use crate::error::ApiResult;
use rutekita_geo::GeoPoint;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Path of the Dijkstra endpoint, relative to the base URL
pub const DIJKSTRA_PATH: &str = "route/dijkstra";

/// Status string the backend uses for a computed route
pub const STATUS_SUCCESS: &str = "success";

/// Routing API interface
#[derive(Clone)]
pub struct RouteApi {
    client: RoutingClient,
}

impl RouteApi {
    /// Create a new routing API interface
    pub(crate) fn new(client: RoutingClient) -> Self {
        Self { client }
    }

    /// Ask the backend for the shortest path between two points
    pub async fn dijkstra(&self, request: &DijkstraRequest) -> ApiResult<DijkstraResponse> {
        self.client.post(DIJKSTRA_PATH, request).await
    }
}

/// Request body for `POST /route/dijkstra`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DijkstraRequest {
    /// Origin latitude
    pub start_lat: f64,
    /// Origin longitude
    pub start_lon: f64,
    /// Destination latitude
    pub end_lat: f64,
    /// Destination longitude
    pub end_lon: f64,
}

impl DijkstraRequest {
    /// Build the request body from two display-order points
    #[must_use]
    pub fn new(origin: GeoPoint, destination: GeoPoint) -> Self {
        Self {
            start_lat: origin.latitude,
            start_lon: origin.longitude,
            end_lat: destination.latitude,
            end_lon: destination.longitude,
        }
    }
}

/// Response body from `POST /route/dijkstra`
///
/// Only `status` is guaranteed; the other fields are present on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DijkstraResponse {
    /// `"success"` when a route was computed
    pub status: String,
    /// Route legs in travel order
    #[serde(default)]
    pub route: Option<Vec<RouteStep>>,
    /// Backend-reported computation time, in the backend's unit
    #[serde(default)]
    pub execution_time: Option<f64>,
    /// Human-readable reason on failure
    #[serde(default)]
    pub message: Option<String>,
}

impl DijkstraResponse {
    /// True when the backend reports a computed route
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// One leg of a returned route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStep {
    /// Leg geometry; absent for degenerate legs and dropped when unreadable
    #[serde(default, deserialize_with = "lenient_geometry")]
    pub geometry: Option<StepGeometry>,
    /// Leg cost in kilometers
    pub cost: f64,
}

impl RouteStep {
    /// The leg's `[lon, lat]` pairs, or an empty slice when geometry is missing
    #[must_use]
    pub fn lon_lat(&self) -> &[[f64; 2]] {
        self.geometry
            .as_ref()
            .and_then(|g| g.coordinates.as_deref())
            .unwrap_or_default()
    }
}

/// GeoJSON LineString-like geometry of a leg
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepGeometry {
    /// GeoJSON type, usually `"LineString"`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// `[lon, lat]` pairs; any altitude is dropped
    #[serde(default, deserialize_with = "lenient_positions")]
    pub coordinates: Option<Vec<[f64; 2]>>,
}

/// A geometry that is not an object leaves the leg without points
fn lenient_geometry<'de, D>(deserializer: D) -> Result<Option<StepGeometry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match serde_json::from_value(v) {
        Ok(geometry) => Some(geometry),
        Err(e) => {
            debug!(error = %e, "Skipping unreadable leg geometry");
            None
        }
    }))
}

/// Accepts GeoJSON positions of two or more numbers
///
/// Anything else leaves the leg without points instead of failing the
/// response.
fn lenient_positions<'de, D>(deserializer: D) -> Result<Option<Vec<[f64; 2]>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        let parsed = positions(&v);
        if parsed.is_none() {
            debug!(coordinates = %v, "Skipping leg with malformed coordinates");
        }
        parsed
    }))
}

fn positions(value: &Value) -> Option<Vec<[f64; 2]>> {
    value
        .as_array()?
        .iter()
        .map(|position| {
            let position = position.as_array()?;
            Some([position.first()?.as_f64()?, position.get(1)?.as_f64()?])
        })
        .collect()
}
