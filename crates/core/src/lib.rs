//! Route search workflow for RuteKita
//!
//! This crate holds everything between the map widget and the routing
//! backend:
//!
//! - **Selection**: which endpoint the next map click sets
//! - **Workflow**: route requests, stale-response handling, notifications
//! - **Map**: tiles, viewport, markers, polyline and banner as a plain scene
//! - **Presentation**: result card and control panel projections
//! - **Configuration**: TOML file layered over defaults and the environment
//!
//! # Example
//!
//! ```rust,no_run
//! use rutekita_core::prelude::*;
//! use rutekita_api_client::RoutingClient;
//!
//! # async fn run() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load(None)?;
//! let client = RoutingClient::with_config(config.client_config()?, config.credentials())?;
//!
//! let mut search = RouteSearch::new(config.depot());
//! search.request_destination_selection();
//! search.commit_point(GeoPoint::new(-6.28, 106.83));
//!
//! if let RouteOutcome::Computed(route) = search.compute_route(&client).await? {
//!     if let Some(card) = ResultCard::project(Some(&route)) {
//!         println!("{} in {}", card.distance_label(), card.duration_label());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod config;
pub mod error;
pub mod map;
pub mod notify;
pub mod presentation;
pub mod route;
pub mod selection;
pub mod workflow;

pub use error::{Result, RouteSearchError, RouteSearchErrorCode};
pub use rutekita_geo::GeoPoint;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::backend::RouteBackend;
    pub use crate::config::AppConfig;
    pub use crate::error::{Result, RouteSearchError};
    pub use crate::map::{BaseMap, MapEventSource, MapScene, MapStyle, MapSurface, Viewport};
    pub use crate::notify::{Level, Notification};
    pub use crate::presentation::{ControlPanel, ResultCard};
    pub use crate::route::{RouteQuery, RouteResult};
    pub use crate::selection::{CommitOutcome, Endpoint, SelectionMode};
    pub use crate::workflow::{PendingRoute, RouteOutcome, RouteSearch};
    pub use rutekita_geo::GeoPoint;
}
