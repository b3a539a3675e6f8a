//! Effective configuration display

use super::load_config;
use anyhow::Result;
use owo_colors::OwoColorize;
use rutekita_api_client::ClientConfig;
use rutekita_cli::output::Status;
use rutekita_core::config::ConfigSchema;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct JsonConfigOutput<'a> {
    path: Option<&'a PathBuf>,
    settings: &'a ConfigSchema,
    client: &'a ClientConfig,
    session_file: Option<PathBuf>,
}

fn row(key: &str, value: impl std::fmt::Display) {
    println!("  {:<18} {}", key.dimmed(), value);
}

/// Print the configuration after file, environment and defaults are merged
pub fn run(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let client = config.client_config()?;
    let session_file = config.schema.session.session_path();

    if json {
        let output = JsonConfigOutput {
            path: config.path.as_ref(),
            settings: &config.schema,
            client: &client,
            session_file,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let source = config
        .path
        .as_ref()
        .map_or_else(|| "built-in defaults".to_string(), |p| p.display().to_string());
    Status::header("Configuration");
    row("source", source);

    let map = &config.schema.map;
    Status::header("Map");
    row("base map", map.base_map.url_template());
    row("depot", format!("{} ({})", map.depot.name, map.depot.point().label()));
    row("center", format!("{} (zoom {})", map.center.label(), map.zoom));
    row("focus zoom", map.focus_zoom);
    row("route color", &map.polyline.color);

    Status::header("Routing service");
    row("base url", &client.base_url);
    row("environment", format!("{:?}", client.environment));
    row("timeout", format!("{}s", client.timeout.as_secs()));
    row("ngrok header", client.skip_ngrok_warning);

    Status::header("Session");
    row("token variable", &config.schema.session.token_env);
    row(
        "session file",
        session_file.map_or_else(|| "none".to_string(), |p| p.display().to_string()),
    );

    Ok(())
}
