//! CLI command implementations

pub mod config;
pub mod interactive;
pub mod route;

use anyhow::{Context, Result};
use rutekita_api_client::RoutingClient;
use rutekita_cli::output::Status;
use rutekita_core::config::AppConfig;
use rutekita_core::workflow::RouteSearch;
use std::path::Path;

/// Load the configuration file, or defaults when none is found
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    AppConfig::load(path).context("Failed to load configuration")
}

/// Client for the configured backend with the configured token sources
pub fn build_client(config: &AppConfig) -> Result<RoutingClient> {
    let client_config = config.client_config()?;
    RoutingClient::with_config(client_config, config.credentials())
        .context("Failed to create routing client")
}

/// Print and clear pending workflow notifications
pub fn flush_notifications(search: &mut RouteSearch) {
    for note in search.take_notifications() {
        Status::notification(&note);
    }
}
