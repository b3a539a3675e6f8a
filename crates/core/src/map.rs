//! Map interaction surface
//!
//! The surface turns a [`RouteSearch`] into a [`MapScene`] (tiles, viewport,
//! markers, route polyline and selection banner) and forwards clicks from a
//! [`MapEventSource`] into the workflow. Rendering backends only draw the
//! scene; they never touch workflow state.

use crate::selection::{CommitOutcome, Endpoint};
use crate::workflow::RouteSearch;
use rutekita_geo::{Bounds, GeoPoint};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// Ubhara depot, the default origin
pub const DEPOT: GeoPoint = GeoPoint::new(-6.2555, 106.8062);

/// Jakarta Selatan, shown before any endpoint is set
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(-6.2615, 106.8106);

pub const DEFAULT_ZOOM: u8 = 13;
pub const FOCUS_ZOOM: u8 = 14;
pub const FIT_PADDING_PX: u32 = 50;

/// Banner text; `{endpoint}` is replaced by "Origin" or "Destination"
pub const DEFAULT_BANNER: &str = "Click on the map to set the {endpoint}";

const MARKER_SHADOW_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/images/marker-shadow.png";

// ============================================================================
// Style
// ============================================================================

/// Tile provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseMap {
    #[default]
    Osm,
    Satellite,
}

impl BaseMap {
    pub fn url_template(self) -> &'static str {
        match self {
            Self::Osm => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            Self::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
        }
    }

    pub fn attribution(self) -> &'static str {
        match self {
            Self::Osm => "&copy; OpenStreetMap contributors",
            Self::Satellite => "&copy; Esri",
        }
    }

    pub fn tile_layer(self) -> TileLayer {
        TileLayer {
            url_template: self.url_template().to_string(),
            attribution: self.attribution().to_string(),
        }
    }
}

impl std::str::FromStr for BaseMap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "osm" | "openstreetmap" => Ok(Self::Osm),
            "satellite" | "esri" => Ok(Self::Satellite),
            other => Err(format!("unknown base map '{other}', expected osm or satellite")),
        }
    }
}

/// Base layer handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

/// Marker image and its geometry in pixels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub icon_url: String,
    pub shadow_url: String,
    pub icon_size: [u32; 2],
    pub icon_anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
    pub shadow_size: [u32; 2],
}

impl MarkerIcon {
    fn colored(color: &str) -> Self {
        Self {
            icon_url: format!(
                "https://raw.githubusercontent.com/pointhi/leaflet-color-markers/master/img/marker-icon-2x-{color}.png"
            ),
            shadow_url: MARKER_SHADOW_URL.to_string(),
            icon_size: [25, 41],
            icon_anchor: [12, 41],
            popup_anchor: [1, -34],
            shadow_size: [41, 41],
        }
    }

    /// Green pin used for the origin
    pub fn depot() -> Self {
        Self::colored("green")
    }

    /// Red pin used for the destination
    pub fn destination() -> Self {
        Self::colored("red")
    }
}

/// Route line appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolylineStyle {
    pub color: String,
    pub weight: u32,
    pub opacity: f64,
    pub dash_array: Option<String>,
}

impl Default for PolylineStyle {
    fn default() -> Self {
        Self {
            color: "#0D9488".to_string(),
            weight: 5,
            opacity: 0.8,
            dash_array: Some("10, 10".to_string()),
        }
    }
}

/// Everything the surface needs to draw, passed in explicitly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapStyle {
    pub base_map: BaseMap,
    pub default_center: GeoPoint,
    pub default_zoom: u8,
    pub focus_zoom: u8,
    pub fit_padding_px: u32,
    pub origin_icon: MarkerIcon,
    pub destination_icon: MarkerIcon,
    pub polyline: PolylineStyle,
    pub banner_template: String,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            base_map: BaseMap::default(),
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            focus_zoom: FOCUS_ZOOM,
            fit_padding_px: FIT_PADDING_PX,
            origin_icon: MarkerIcon::depot(),
            destination_icon: MarkerIcon::destination(),
            polyline: PolylineStyle::default(),
            banner_template: DEFAULT_BANNER.to_string(),
        }
    }
}

impl MapStyle {
    fn banner_text(&self, endpoint: Endpoint) -> String {
        self.banner_template.replace("{endpoint}", endpoint.label())
    }
}

// ============================================================================
// Events
// ============================================================================

/// Input from the map widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    Click(GeoPoint),
}

/// Producer side of map input
///
/// Holds at most one subscriber. Events emitted with nobody listening are
/// dropped.
#[derive(Debug, Default)]
pub struct MapEventSource {
    subscriber: Option<mpsc::UnboundedSender<MapEvent>>,
}

impl MapEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing subscriber with a fresh one
    pub fn subscribe(&mut self) -> MapSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscriber = Some(tx);
        MapSubscription { events: rx }
    }

    pub fn has_subscriber(&self) -> bool {
        self.subscriber.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Deliver an event, returning false if nobody received it
    pub fn emit(&mut self, event: MapEvent) -> bool {
        let Some(tx) = &self.subscriber else {
            return false;
        };
        if tx.send(event).is_ok() {
            true
        } else {
            debug!(?event, "Map event dropped, subscriber gone");
            self.subscriber = None;
            false
        }
    }

    pub fn click(&mut self, point: GeoPoint) -> bool {
        self.emit(MapEvent::Click(point))
    }
}

/// Consumer side of map input; unsubscribes when dropped
#[derive(Debug)]
pub struct MapSubscription {
    events: mpsc::UnboundedReceiver<MapEvent>,
}

impl MapSubscription {
    /// Next queued event without waiting
    pub fn try_next(&mut self) -> Option<MapEvent> {
        self.events.try_recv().ok()
    }
}

// ============================================================================
// Scene
// ============================================================================

/// Camera placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Viewport {
    FitBounds { bounds: Bounds, padding_px: u32 },
    Center { center: GeoPoint, zoom: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerPopup {
    pub title: String,
    pub coordinates: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub endpoint: Endpoint,
    pub position: GeoPoint,
    pub icon: MarkerIcon,
    pub popup: MarkerPopup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub points: Vec<GeoPoint>,
    pub style: PolylineStyle,
}

/// Prompt shown while an endpoint is being picked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionBanner {
    pub endpoint: Endpoint,
    pub text: String,
}

/// Drawable snapshot of the workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub tiles: TileLayer,
    pub viewport: Viewport,
    pub markers: Vec<Marker>,
    pub polyline: Option<Polyline>,
    pub banner: Option<SelectionBanner>,
}

impl MapScene {
    pub fn marker(&self, endpoint: Endpoint) -> Option<&Marker> {
        self.markers.iter().find(|m| m.endpoint == endpoint)
    }
}

// ============================================================================
// Surface
// ============================================================================

/// Binds a map widget to a [`RouteSearch`]
#[derive(Debug)]
pub struct MapSurface {
    style: MapStyle,
    subscription: Option<MapSubscription>,
}

impl MapSurface {
    pub fn new(style: MapStyle) -> Self {
        Self {
            style,
            subscription: None,
        }
    }

    pub fn style(&self) -> &MapStyle {
        &self.style
    }

    /// Start listening to `source`, dropping any previous subscription
    pub fn attach(&mut self, source: &mut MapEventSource) {
        self.subscription = Some(source.subscribe());
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stop listening; later events are dropped at the source
    pub fn teardown(&mut self) {
        self.subscription = None;
    }

    /// Feed every queued click to the workflow, in arrival order
    ///
    /// Clicks go through regardless of the selection mode; the workflow
    /// decides whether they change anything.
    pub fn dispatch(&mut self, search: &mut RouteSearch) -> Vec<CommitOutcome> {
        let mut outcomes = Vec::new();
        if let Some(subscription) = self.subscription.as_mut() {
            while let Some(MapEvent::Click(point)) = subscription.try_next() {
                outcomes.push(search.commit_point(point));
            }
        }
        outcomes
    }

    /// Project the workflow into a drawable scene
    pub fn render(&self, search: &RouteSearch) -> MapScene {
        let origin = search.origin();
        let destination = search.destination();
        let path = search.result().map(|r| &r.path).filter(|p| !p.is_empty());

        let mut markers = Vec::with_capacity(2);
        if let Some(point) = origin {
            markers.push(Marker {
                endpoint: Endpoint::Origin,
                position: point,
                icon: self.style.origin_icon.clone(),
                popup: MarkerPopup {
                    title: "Origin (Depot)".to_string(),
                    coordinates: point.label(),
                },
            });
        }
        if let Some(point) = destination {
            markers.push(Marker {
                endpoint: Endpoint::Destination,
                position: point,
                icon: self.style.destination_icon.clone(),
                popup: MarkerPopup {
                    title: Endpoint::Destination.label().to_string(),
                    coordinates: point.label(),
                },
            });
        }

        let viewport = match (origin, destination) {
            (Some(a), Some(b)) => {
                let mut bounds = Bounds {
                    south_west: a,
                    north_east: a,
                };
                bounds.extend(b);
                if let Some(path) = path {
                    path.points().iter().for_each(|p| bounds.extend(*p));
                }
                Viewport::FitBounds {
                    bounds,
                    padding_px: self.style.fit_padding_px,
                }
            }
            (Some(point), None) | (None, Some(point)) => Viewport::Center {
                center: point,
                zoom: self.style.focus_zoom,
            },
            (None, None) => Viewport::Center {
                center: self.style.default_center,
                zoom: self.style.default_zoom,
            },
        };

        let polyline = path.map(|path| Polyline {
            points: path.points().to_vec(),
            style: self.style.polyline.clone(),
        });

        let banner = search.mode().endpoint().map(|endpoint| SelectionBanner {
            endpoint,
            text: self.style.banner_text(endpoint),
        });

        MapScene {
            tiles: self.style.base_map.tile_layer(),
            viewport,
            markers,
            polyline,
            banner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionMode;

    const DROP_OFF: GeoPoint = GeoPoint::new(-6.28, 106.83);

    fn surface() -> (MapSurface, MapEventSource) {
        let mut source = MapEventSource::new();
        let mut surface = MapSurface::new(MapStyle::default());
        surface.attach(&mut source);
        (surface, source)
    }

    #[test]
    fn test_base_map_tiles() {
        let osm = BaseMap::Osm.tile_layer();
        assert!(osm.url_template.contains("tile.openstreetmap.org"));
        assert!(osm.attribution.contains("OpenStreetMap"));

        let sat = BaseMap::Satellite.tile_layer();
        assert!(sat.url_template.contains("World_Imagery"));
        assert!(sat.attribution.contains("Esri"));

        assert_eq!("satellite".parse::<BaseMap>().unwrap(), BaseMap::Satellite);
        assert!("mapbox".parse::<BaseMap>().is_err());
    }

    #[test]
    fn test_icons_differ_only_in_color() {
        let depot = MarkerIcon::depot();
        let dest = MarkerIcon::destination();
        assert!(depot.icon_url.ends_with("green.png"));
        assert!(dest.icon_url.ends_with("red.png"));
        assert_eq!(depot.icon_size, [25, 41]);
        assert_eq!(depot.icon_anchor, dest.icon_anchor);
        assert_eq!(depot.shadow_url, dest.shadow_url);
    }

    #[test]
    fn test_initial_scene() {
        let (surface, _source) = surface();
        let search = RouteSearch::new(DEPOT);
        let scene = surface.render(&search);

        assert_eq!(scene.markers.len(), 1);
        let origin = scene.marker(Endpoint::Origin).unwrap();
        assert_eq!(origin.position, DEPOT);
        assert_eq!(origin.popup.coordinates, "-6.2555, 106.8062");
        assert!(scene.polyline.is_none());
        assert!(scene.banner.is_none());
        assert_eq!(
            scene.viewport,
            Viewport::Center {
                center: DEPOT,
                zoom: FOCUS_ZOOM
            }
        );
    }

    #[test]
    fn test_clicks_flow_through_surface() {
        let (mut surface, mut source) = surface();
        let mut search = RouteSearch::new(DEPOT);

        assert!(source.click(DROP_OFF));
        let outcomes = surface.dispatch(&mut search);
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].is_committed());

        search.request_destination_selection();
        assert_eq!(
            surface.render(&search).banner.unwrap().text,
            "Click on the map to set the Destination"
        );

        source.click(DROP_OFF);
        source.click(GeoPoint::new(-6.3, 106.9));
        let outcomes = surface.dispatch(&mut search);
        assert!(outcomes[0].is_committed());
        assert!(!outcomes[1].is_committed());
        assert_eq!(search.destination(), Some(DROP_OFF));
        assert_eq!(search.mode(), SelectionMode::Idle);

        let scene = surface.render(&search);
        assert!(scene.banner.is_none());
        assert!(matches!(scene.viewport, Viewport::FitBounds { padding_px: 50, .. }));
        assert!(scene.marker(Endpoint::Destination).unwrap().icon.icon_url.ends_with("red.png"));
    }

    #[test]
    fn test_teardown_unsubscribes() {
        let (mut surface, mut source) = surface();
        assert!(source.has_subscriber());

        surface.teardown();
        assert!(!surface.is_attached());
        assert!(!source.has_subscriber());
        assert!(!source.click(DROP_OFF));
    }

    #[test]
    fn test_reattach_replaces_subscription() {
        let (mut surface, mut source) = surface();
        let mut search = RouteSearch::new(DEPOT);
        search.request_origin_selection();

        source.click(DROP_OFF);
        surface.attach(&mut source);
        assert!(surface.dispatch(&mut search).is_empty());
        assert_eq!(search.origin(), Some(DEPOT));
    }

    #[test]
    fn test_route_drawn_and_fitted() {
        let (surface, _source) = surface();
        let mut search = RouteSearch::new(DEPOT);
        search.request_destination_selection();
        search.commit_point(DROP_OFF);

        let response = serde_json::from_value(serde_json::json!({
            "status": "success",
            "route": [{
                "geometry": {"coordinates": [[106.8062, -6.2555], [106.79, -6.29], [106.83, -6.28]]},
                "cost": 4.0
            }],
            "execution_time": 1.0
        }))
        .unwrap();
        let pending = search.begin_route().unwrap().unwrap();
        search.finish_route(pending, Ok(response)).unwrap();

        let scene = surface.render(&search);
        let line = scene.polyline.unwrap();
        assert_eq!(line.points.len(), 3);
        assert_eq!(line.style.color, "#0D9488");

        let Viewport::FitBounds { bounds, .. } = scene.viewport else {
            panic!("expected fitted viewport");
        };
        assert!(bounds.contains(&GeoPoint::new(-6.29, 106.79)));
        assert!(bounds.contains(&DEPOT));
        assert!(bounds.contains(&DROP_OFF));
    }
}
