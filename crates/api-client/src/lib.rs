//! HTTP client for the RuteKita routing backend
//!
//! This crate speaks the backend's wire contract and nothing more: it sends
//! the shortest-path query, attaches the session's bearer token, and hands
//! back the decoded payload. Turning that payload into a displayable route is
//! the job of `rutekita-core`.
//!
//! # Features
//!
//! - **Environment-based configuration**: backend URL and timeout from environment variables
//! - **Pluggable credentials**: the bearer token is read from a [`CredentialProvider`] on every call
//! - **Request correlation**: every request carries a unique `X-Request-ID`
//!
//! # Example
//!
//! ```rust,no_run
//! use rutekita_api_client::{ClientConfig, EnvToken, RoutingClient};
//! use rutekita_api_client::endpoints::DijkstraRequest;
//! use rutekita_geo::GeoPoint;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RoutingClient::with_config(
//!         ClientConfig::from_env()?,
//!         EnvToken::default(),
//!     )?;
//!
//!     let request = DijkstraRequest::new(
//!         GeoPoint::new(-6.2555, 106.8062),
//!         GeoPoint::new(-6.2615, 106.8106),
//!     );
//!     let response = client.routes().dijkstra(&request).await?;
//!     println!("status: {}", response.status);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod endpoints;
pub mod error;

pub use client::RoutingClient;
pub use config::{ClientConfig, Environment};
pub use credentials::{ChainedCredentials, CredentialProvider, EnvToken, SessionFile, StaticToken};
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::RoutingClient;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::credentials::{
        ChainedCredentials, CredentialProvider, EnvToken, SessionFile, StaticToken,
    };
    pub use crate::endpoints::{DijkstraRequest, DijkstraResponse, RouteApi, RouteStep};
    pub use crate::error::{ApiError, ApiResult};
}
