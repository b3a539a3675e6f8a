//! Prompt-driven session standing in for the map page
//!
//! Stdin is read on a helper thread and fed through a channel so commands
//! keep working while a route request is outstanding: `reset` during a
//! calculation orphans it, and a second `calc` is refused.

use super::{build_client, flush_notifications, load_config};
use anyhow::Result;
use owo_colors::OwoColorize;
use rutekita_api_client::endpoints::DijkstraResponse;
use rutekita_api_client::{ApiResult, RoutingClient};
use rutekita_cli::output::Status;
use rutekita_cli::render;
use rutekita_core::backend::RouteBackend;
use rutekita_core::map::{MapEventSource, MapSurface};
use rutekita_core::presentation::{ControlPanel, ResultCard};
use rutekita_core::workflow::{PendingRoute, RouteOutcome, RouteSearch};
use rutekita_geo::GeoPoint;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use tokio::sync::mpsc;

const HELP: &str = "\
Commands:
  origin              pick the origin with the next click
  destination         pick the destination with the next click
  click LAT LON       click the map at a point (also LAT,LON)
  cancel              stop picking
  calc                compute the route
  reset               back to the depot, clear destination and route
  show                print the map scene, panel and result
  help                this text
  quit                leave";

/// A parsed prompt line
#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Origin,
    Destination,
    Click(GeoPoint),
    Cancel,
    Calculate,
    Reset,
    Show,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let command = match word.to_lowercase().as_str() {
        "" => return Ok(None),
        "origin" | "o" => Command::Origin,
        "destination" | "dest" | "d" => Command::Destination,
        "click" | "c" => {
            let coords = rest
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(",");
            let point = coords
                .parse::<GeoPoint>()
                .map_err(|e| format!("click expects LAT LON: {e}"))?;
            Command::Click(point)
        }
        "cancel" => Command::Cancel,
        "calc" | "calculate" | "route" => Command::Calculate,
        "reset" => Command::Reset,
        "show" | "s" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(command))
}

type ResponseFuture = Pin<Box<dyn Future<Output = ApiResult<DijkstraResponse>>>>;

struct InFlight {
    pending: PendingRoute,
    response: ResponseFuture,
}

async fn next_response(in_flight: &mut Option<InFlight>) -> ApiResult<DijkstraResponse> {
    match in_flight {
        Some(flight) => flight.response.as_mut().await,
        None => std::future::pending().await,
    }
}

fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn show(surface: &MapSurface, search: &RouteSearch) {
    Status::header("Map");
    render::print_scene(&surface.render(search));
    Status::header("Route search");
    render::print_panel(&ControlPanel::project(search));
    if let Some(card) = ResultCard::project(search.result()) {
        println!();
        render::print_card(&card);
    }
}

/// Run the prompt until `quit` or end of input
pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let client = build_client(&config)?;

    let mut search = RouteSearch::new(config.depot());
    let mut source = MapEventSource::new();
    let mut surface = MapSurface::new(config.schema.map.style());
    surface.attach(&mut source);

    println!(
        "{} depot {} ({}), backend {}",
        "RuteKita".bold(),
        config.schema.map.depot.name,
        config.depot().label(),
        client.base_url()
    );
    println!("{}", "Type 'help' for commands.".dimmed());

    let mut lines = spawn_stdin_reader();
    let mut in_flight: Option<InFlight> = None;

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(message) => {
                        Status::warning(&message);
                        continue;
                    }
                };
                match command {
                    Command::Origin => search.request_origin_selection(),
                    Command::Destination => search.request_destination_selection(),
                    Command::Click(point) => {
                        source.click(point);
                        for outcome in surface.dispatch(&mut search) {
                            if !outcome.is_committed() {
                                Status::info("Click ignored; choose origin or destination first");
                            }
                        }
                    }
                    Command::Cancel => search.cancel(),
                    Command::Calculate => match search.begin_route() {
                        Ok(Some(pending)) => {
                            let request = pending.query().to_request();
                            let backend: RoutingClient = client.clone();
                            let response: ResponseFuture =
                                Box::pin(async move { backend.shortest_path(&request).await });
                            in_flight = Some(InFlight { pending, response });
                            Status::info("Calculating route...");
                        }
                        Ok(None) => Status::info("Already calculating"),
                        Err(_) => {}
                    },
                    Command::Reset => {
                        search.reset();
                        Status::info("Reset to the depot");
                    }
                    Command::Show => show(&surface, &search),
                    Command::Help => println!("{HELP}"),
                    Command::Quit => break,
                }
                flush_notifications(&mut search);
                if let Some(endpoint) = search.mode().endpoint() {
                    println!("{}", format!(">> click to set the {endpoint}").yellow());
                }
            }
            response = next_response(&mut in_flight) => {
                let Some(flight) = in_flight.take() else { continue };
                match search.finish_route(flight.pending, response) {
                    Ok(RouteOutcome::Computed(result)) => {
                        flush_notifications(&mut search);
                        if let Some(card) = ResultCard::project(Some(&result)) {
                            render::print_card(&card);
                        }
                    }
                    Ok(RouteOutcome::Discarded) => {
                        Status::info("Dropped a response from before the last reset");
                    }
                    Ok(RouteOutcome::AlreadyCalculating) => {}
                    Err(_) => flush_notifications(&mut search),
                }
            }
        }
    }

    surface.teardown();
    Ok(())
}
