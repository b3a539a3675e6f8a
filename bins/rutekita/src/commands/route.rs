//! One-shot route computation

use super::{build_client, flush_notifications, load_config};
use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use rutekita_cli::output::{format_duration, Status};
use rutekita_cli::{progress, render};
use rutekita_core::map::MapSurface;
use rutekita_core::presentation::ResultCard;
use rutekita_core::route::RouteResult;
use rutekita_core::workflow::{RouteOutcome, RouteSearch};
use rutekita_geo::GeoPoint;
use rutekita_telemetry::metrics;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

#[derive(Serialize)]
struct JsonRouteOutput<'a> {
    origin: GeoPoint,
    destination: GeoPoint,
    card: ResultCard,
    route: &'a RouteResult,
    geometric_km: f64,
}

/// Compute a route from `from` (or the depot) to `to`
pub async fn run(
    config_path: Option<&Path>,
    from: Option<GeoPoint>,
    to: Option<GeoPoint>,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let mut search = RouteSearch::new(config.depot());

    if let Some(origin) = from {
        search.request_origin_selection();
        search.commit_point(origin);
    }
    if let Some(destination) = to {
        search.request_destination_selection();
        search.commit_point(destination);
    }
    // Endpoint confirmations only matter in the interactive session
    search.take_notifications();

    let client = build_client(&config)?;
    let spinner = (!json && search.destination().is_some())
        .then(|| progress::spinner("Calculating route..."));
    let started = Instant::now();
    let outcome = search.compute_route(&client).await;
    if let Some(pb) = &spinner {
        progress::clear(pb);
    }

    if json {
        search.take_notifications();
    } else {
        flush_notifications(&mut search);
    }

    let result = match outcome? {
        RouteOutcome::Computed(result) => result,
        other => bail!("Route was not computed: {other:?}"),
    };

    let card = ResultCard::project(Some(&result));
    let (Some(card), Some(origin), Some(destination)) = (card, search.origin(), search.destination())
    else {
        bail!("Route computed without both endpoints");
    };

    if json {
        let output = JsonRouteOutput {
            origin,
            destination,
            card,
            route: &result,
            geometric_km: result.path.length_km(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    Status::header("Route");
    println!("  {} {}", "From".dimmed(), origin.label());
    println!("  {} {}", "To  ".dimmed(), destination.label());
    println!();
    render::print_card(&card);

    if verbose {
        println!();
        let surface = MapSurface::new(config.schema.map.style());
        render::print_scene(&surface.render(&search));
        println!();
        Status::info(&format!(
            "Round trip {}, path length {:.2} km",
            format_duration(started.elapsed()),
            result.path.length_km()
        ));
        tracing::debug!(metrics = %metrics().export_json(), "Session metrics");
    }

    Ok(())
}
