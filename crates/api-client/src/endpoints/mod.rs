//! Endpoint-specific API implementations
//!
//! | Module | Backend route | Description |
//! |--------|---------------|-------------|
//! | `route` | `POST /route/dijkstra` | Shortest path between two points |

pub mod route;

pub use route::{DijkstraRequest, DijkstraResponse, RouteApi, RouteStep, StepGeometry};
