//! Seam between the workflow and the routing service

use rutekita_api_client::endpoints::{DijkstraRequest, DijkstraResponse};
use rutekita_api_client::{ApiResult, RoutingClient};

/// Something that answers shortest-path queries
///
/// Implemented for [`RoutingClient`]; tests substitute in-memory backends.
#[allow(async_fn_in_trait)]
pub trait RouteBackend {
    /// Send one query and return the decoded payload
    async fn shortest_path(&self, request: &DijkstraRequest) -> ApiResult<DijkstraResponse>;
}

impl RouteBackend for RoutingClient {
    async fn shortest_path(&self, request: &DijkstraRequest) -> ApiResult<DijkstraResponse> {
        self.routes().dijkstra(request).await
    }
}
