//! Text rendering of workflow projections
//!
//! The `*_lines` functions build plain lines so they can be tested and
//! reused; the `print_*` functions add color and write to stdout.

use crate::output::format_count;
use owo_colors::OwoColorize;
use rutekita_core::map::{MapScene, Viewport};
use rutekita_core::presentation::{ControlPanel, EndpointField, ResultCard};

fn field_line(field: &EndpointField) -> String {
    let marker = if field.target_active { "◎" } else { "○" };
    format!("{marker} {:<12} {}", field.endpoint.label(), field.label)
}

fn button_text(panel: &ControlPanel) -> String {
    if panel.calculate_enabled {
        format!("[ {} ]", panel.calculate_label)
    } else {
        format!("( {} )", panel.calculate_label)
    }
}

/// Endpoint rows and the calculate button
pub fn panel_lines(panel: &ControlPanel) -> Vec<String> {
    vec![
        field_line(&panel.origin),
        field_line(&panel.destination),
        button_text(panel),
    ]
}

/// Distance, estimated time and backend compute time
pub fn card_lines(card: &ResultCard) -> Vec<String> {
    vec![
        format!("Total distance   {}", card.distance_label()),
        format!("Estimated time   {}", card.duration_label()),
        format!("Computed in      {}", card.execution_label()),
    ]
}

/// Summary of what the map would draw
pub fn scene_lines(scene: &MapScene) -> Vec<String> {
    let mut lines = vec![format!("Tiles     {}", scene.tiles.url_template)];

    lines.push(match scene.viewport {
        Viewport::FitBounds { bounds, padding_px } => format!(
            "Viewport  fit {} .. {} (padding {padding_px}px)",
            bounds.south_west.label(),
            bounds.north_east.label()
        ),
        Viewport::Center { center, zoom } => {
            format!("Viewport  center {} (zoom {zoom})", center.label())
        }
    });

    for marker in &scene.markers {
        lines.push(format!("Marker    {} at {}", marker.popup.title, marker.popup.coordinates));
    }

    if let Some(line) = &scene.polyline {
        lines.push(format!(
            "Route     {} in {}",
            format_count(line.points.len(), "point", "points"),
            line.style.color
        ));
    }

    if let Some(banner) = &scene.banner {
        lines.push(format!(">> {} <<", banner.text));
    }
    lines
}

pub fn print_panel(panel: &ControlPanel) {
    println!("  {}", field_line(&panel.origin));
    println!("  {}", field_line(&panel.destination));
    let button = button_text(panel);
    if panel.calculate_enabled {
        println!("  {}", button.green().bold());
    } else {
        println!("  {}", button.dimmed());
    }
}

pub fn print_card(card: &ResultCard) {
    for line in card_lines(card) {
        println!("  {}", line.cyan());
    }
}

pub fn print_scene(scene: &MapScene) {
    for line in scene_lines(scene) {
        if line.starts_with(">>") {
            println!("  {}", line.yellow().bold());
        } else {
            println!("  {}", line.dimmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rutekita_core::map::{MapStyle, MapSurface, DEPOT};
    use rutekita_core::route::{RouteResult, RouteSegment};
    use rutekita_core::workflow::RouteSearch;
    use rutekita_geo::GeoPoint;

    #[test]
    fn test_panel_lines_initial() {
        let search = RouteSearch::new(DEPOT);
        let lines = panel_lines(&ControlPanel::project(&search));

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("-6.2555, 106.8062"));
        assert!(lines[1].starts_with("○ Destination"));
        assert!(lines[2].starts_with("( "));
    }

    #[test]
    fn test_panel_lines_active_target() {
        let mut search = RouteSearch::new(DEPOT);
        search.request_destination_selection();
        let lines = panel_lines(&ControlPanel::project(&search));
        assert!(lines[1].starts_with("◎"));
    }

    #[test]
    fn test_card_lines() {
        let result = RouteResult::from_segments(
            &[RouteSegment { lon_lat: vec![], cost: 2.0 }],
            12.5,
        );
        let card = ResultCard::project(Some(&result)).unwrap();
        let lines = card_lines(&card);

        assert!(lines[0].ends_with("2.00 km"));
        assert!(lines[1].ends_with("6 min"));
        assert!(lines[2].ends_with("12.5000 ms"));
    }

    #[test]
    fn test_scene_lines_with_banner() {
        let surface = MapSurface::new(MapStyle::default());
        let mut search = RouteSearch::new(DEPOT);
        search.request_origin_selection();
        search.commit_point(GeoPoint::new(-6.2, 106.8));
        search.request_destination_selection();

        let lines = scene_lines(&surface.render(&search));
        assert!(lines[0].contains("openstreetmap"));
        assert!(lines[1].contains("zoom 14"));
        assert!(lines.iter().any(|l| l.contains("Origin (Depot) at -6.2000, 106.8000")));
        assert_eq!(lines.last().unwrap(), ">> Click on the map to set the Destination <<");
    }
}
