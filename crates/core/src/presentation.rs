//! Read-only projections of the workflow for display
//!
//! [`ResultCard`] is the three-figure summary of the latest route and
//! [`ControlPanel`] the endpoint inputs and action buttons. Both are
//! recomputed from a [`RouteSearch`] on every render and hold no state.

use crate::route::RouteResult;
use crate::selection::Endpoint;
use crate::workflow::RouteSearch;
use rutekita_geo::GeoPoint;
use serde::Serialize;

pub const ORIGIN_PLACEHOLDER: &str = "Not set";
pub const DESTINATION_PLACEHOLDER: &str = "Press target, then pick on the map";
pub const CALCULATE_LABEL: &str = "Find route";
pub const CALCULATING_LABEL: &str = "Calculating...";

/// Summary of the latest successful route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCard {
    /// Kilometres, rounded to two decimals
    pub distance_km: f64,
    pub duration_minutes: u64,
    /// As reported by the backend, unrounded
    pub execution_time_ms: f64,
}

impl ResultCard {
    /// `None` before the first success and after a reset
    pub fn project(result: Option<&RouteResult>) -> Option<Self> {
        result.map(|r| Self {
            distance_km: round2(r.distance_km),
            duration_minutes: r.duration_minutes,
            execution_time_ms: r.execution_time_ms,
        })
    }

    pub fn distance_label(&self) -> String {
        format!("{:.2} km", self.distance_km)
    }

    pub fn duration_label(&self) -> String {
        format!("{} min", self.duration_minutes)
    }

    pub fn execution_label(&self) -> String {
        format!("{:.4} ms", self.execution_time_ms)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One endpoint row: value or placeholder, and whether its target is armed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointField {
    pub endpoint: Endpoint,
    pub label: String,
    pub is_set: bool,
    pub target_active: bool,
}

impl EndpointField {
    fn new(endpoint: Endpoint, point: Option<GeoPoint>, active: Option<Endpoint>) -> Self {
        let placeholder = match endpoint {
            Endpoint::Origin => ORIGIN_PLACEHOLDER,
            Endpoint::Destination => DESTINATION_PLACEHOLDER,
        };
        Self {
            endpoint,
            label: point.map_or_else(|| placeholder.to_string(), |p| p.label()),
            is_set: point.is_some(),
            target_active: active == Some(endpoint),
        }
    }
}

/// Inputs and buttons beside the map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlPanel {
    pub origin: EndpointField,
    pub destination: EndpointField,
    pub calculate_enabled: bool,
    pub calculate_label: &'static str,
}

impl ControlPanel {
    pub fn project(search: &RouteSearch) -> Self {
        let active = search.mode().endpoint();
        let calculating = search.is_calculating();
        Self {
            origin: EndpointField::new(Endpoint::Origin, search.origin(), active),
            destination: EndpointField::new(Endpoint::Destination, search.destination(), active),
            calculate_enabled: !calculating && search.destination().is_some(),
            calculate_label: if calculating {
                CALCULATING_LABEL
            } else {
                CALCULATE_LABEL
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteSegment;

    const DEPOT: GeoPoint = GeoPoint::new(-6.2555, 106.8062);

    #[test]
    fn test_card_rounding() {
        let result = RouteResult::from_segments(
            &[
                RouteSegment { lon_lat: vec![], cost: 1.234 },
                RouteSegment { lon_lat: vec![], cost: 2.0 },
            ],
            0.123_456,
        );
        let card = ResultCard::project(Some(&result)).unwrap();

        assert_eq!(card.distance_km, 3.23);
        assert_eq!(card.duration_minutes, 10);
        assert_eq!(card.distance_label(), "3.23 km");
        assert_eq!(card.duration_label(), "10 min");
        assert_eq!(card.execution_label(), "0.1235 ms");
    }

    #[test]
    fn test_no_card_without_result() {
        assert!(ResultCard::project(None).is_none());

        let search = RouteSearch::new(DEPOT);
        assert!(ResultCard::project(search.result()).is_none());
    }

    #[test]
    fn test_panel_initial() {
        let search = RouteSearch::new(DEPOT);
        let panel = ControlPanel::project(&search);

        assert_eq!(panel.origin.label, "-6.2555, 106.8062");
        assert!(panel.origin.is_set);
        assert_eq!(panel.destination.label, DESTINATION_PLACEHOLDER);
        assert!(!panel.destination.is_set);
        assert!(!panel.calculate_enabled);
        assert_eq!(panel.calculate_label, CALCULATE_LABEL);
    }

    #[test]
    fn test_panel_tracks_target_and_calculation() {
        let mut search = RouteSearch::new(DEPOT);
        search.request_destination_selection();
        let panel = ControlPanel::project(&search);
        assert!(panel.destination.target_active);
        assert!(!panel.origin.target_active);

        search.commit_point(GeoPoint::new(-6.28, 106.83));
        let panel = ControlPanel::project(&search);
        assert!(!panel.destination.target_active);
        assert!(panel.calculate_enabled);

        let _pending = search.begin_route().unwrap().unwrap();
        let panel = ControlPanel::project(&search);
        assert!(!panel.calculate_enabled);
        assert_eq!(panel.calculate_label, CALCULATING_LABEL);
    }
}
