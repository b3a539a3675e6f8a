//! Endpoint selection state machine
//!
//! Tracks which endpoint, if any, the next map click will set. The machine
//! owns the origin and destination points; nothing else writes them.
//!
//! `request_*_selection` moves to the matching awaiting state from anywhere.
//! A click in an awaiting state sets that endpoint and returns to `Idle`; a
//! click while `Idle` does nothing.

use rutekita_geo::GeoPoint;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Which endpoint of the route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Origin,
    Destination,
}

impl Endpoint {
    /// Display name
    pub fn label(self) -> &'static str {
        match self {
            Self::Origin => "Origin",
            Self::Destination => "Destination",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the next map click will do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SelectionMode {
    /// Clicks are ignored
    #[default]
    Idle,
    /// Next click sets the origin
    AwaitingOrigin,
    /// Next click sets the destination
    AwaitingDestination,
}

impl SelectionMode {
    /// The endpoint being picked, `None` when idle
    pub fn endpoint(self) -> Option<Endpoint> {
        match self {
            Self::Idle => None,
            Self::AwaitingOrigin => Some(Endpoint::Origin),
            Self::AwaitingDestination => Some(Endpoint::Destination),
        }
    }

    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

/// Why a click had no effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No endpoint was being picked
    NotSelecting,
    /// Click outside the valid coordinate range
    InvalidPoint,
}

/// Result of forwarding a click
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommitOutcome {
    /// The point replaced the given endpoint
    Committed { endpoint: Endpoint, point: GeoPoint },
    /// Nothing changed
    Ignored(IgnoreReason),
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Origin, destination and the current selection mode
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    depot: GeoPoint,
    origin: Option<GeoPoint>,
    destination: Option<GeoPoint>,
    mode: SelectionMode,
}

impl Selection {
    /// Fresh selection: origin at the depot, no destination, idle
    pub fn new(depot: GeoPoint) -> Self {
        Self {
            depot,
            origin: Some(depot),
            destination: None,
            mode: SelectionMode::Idle,
        }
    }

    pub fn depot(&self) -> GeoPoint {
        self.depot
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.origin
    }

    pub fn destination(&self) -> Option<GeoPoint> {
        self.destination
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Both endpoints, if both are set
    pub fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        self.origin.zip(self.destination)
    }

    /// Arm the next click to set the origin
    pub fn request_origin_selection(&mut self) {
        self.enter(SelectionMode::AwaitingOrigin);
    }

    /// Arm the next click to set the destination
    pub fn request_destination_selection(&mut self) {
        self.enter(SelectionMode::AwaitingDestination);
    }

    fn enter(&mut self, mode: SelectionMode) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "Selection mode changed");
            self.mode = mode;
        }
    }

    /// Apply a map click
    pub fn commit_point(&mut self, point: GeoPoint) -> CommitOutcome {
        let Some(endpoint) = self.mode.endpoint() else {
            return CommitOutcome::Ignored(IgnoreReason::NotSelecting);
        };

        if !point.is_valid() {
            warn!(latitude = point.latitude, longitude = point.longitude, "Ignoring click outside valid range");
            return CommitOutcome::Ignored(IgnoreReason::InvalidPoint);
        }

        match endpoint {
            Endpoint::Origin => self.origin = Some(point),
            Endpoint::Destination => self.destination = Some(point),
        }
        self.mode = SelectionMode::Idle;
        debug!(endpoint = %endpoint, point = %point, "Endpoint committed");

        CommitOutcome::Committed { endpoint, point }
    }

    /// Leave selection mode, keeping both endpoints
    pub fn cancel(&mut self) {
        self.enter(SelectionMode::Idle);
    }

    /// Origin back to the depot, destination cleared, idle
    pub fn reset(&mut self) {
        self.origin = Some(self.depot);
        self.destination = None;
        self.mode = SelectionMode::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DEPOT: GeoPoint = GeoPoint::new(-6.2555, 106.8062);

    #[test]
    fn test_initial_state() {
        let selection = Selection::new(DEPOT);
        assert_eq!(selection.mode(), SelectionMode::Idle);
        assert_eq!(selection.origin(), Some(DEPOT));
        assert_eq!(selection.destination(), None);
        assert!(selection.endpoints().is_none());
    }

    #[test]
    fn test_commit_destination() {
        let mut selection = Selection::new(DEPOT);
        let point = GeoPoint::new(-6.27, 106.82);

        selection.request_destination_selection();
        let outcome = selection.commit_point(point);

        assert_eq!(
            outcome,
            CommitOutcome::Committed { endpoint: Endpoint::Destination, point }
        );
        assert_eq!(selection.destination(), Some(point));
        assert_eq!(selection.origin(), Some(DEPOT));
        assert!(selection.mode().is_idle());
        assert_eq!(selection.endpoints(), Some((DEPOT, point)));
    }

    #[test]
    fn test_click_while_idle_is_noop() {
        let mut selection = Selection::new(DEPOT);
        let before = selection.clone();

        let outcome = selection.commit_point(GeoPoint::new(-6.3, 106.9));

        assert_eq!(outcome, CommitOutcome::Ignored(IgnoreReason::NotSelecting));
        assert_eq!(selection, before);
    }

    #[test]
    fn test_invalid_click_keeps_mode() {
        let mut selection = Selection::new(DEPOT);
        selection.request_origin_selection();

        let outcome = selection.commit_point(GeoPoint::new(-6.3, 286.9));

        assert_eq!(outcome, CommitOutcome::Ignored(IgnoreReason::InvalidPoint));
        assert_eq!(selection.mode(), SelectionMode::AwaitingOrigin);
        assert_eq!(selection.origin(), Some(DEPOT));
    }

    #[test]
    fn test_request_is_idempotent_and_switchable() {
        let mut selection = Selection::new(DEPOT);
        selection.request_origin_selection();
        selection.request_origin_selection();
        assert_eq!(selection.mode(), SelectionMode::AwaitingOrigin);

        selection.request_destination_selection();
        assert_eq!(selection.mode(), SelectionMode::AwaitingDestination);
    }

    #[test]
    fn test_cancel_keeps_endpoints() {
        let mut selection = Selection::new(DEPOT);
        selection.request_destination_selection();
        selection.commit_point(GeoPoint::new(-6.27, 106.82));
        selection.request_origin_selection();

        selection.cancel();

        assert!(selection.mode().is_idle());
        assert_eq!(selection.origin(), Some(DEPOT));
        assert_eq!(selection.destination(), Some(GeoPoint::new(-6.27, 106.82)));
    }

    #[test]
    fn test_reset_restores_depot() {
        let mut selection = Selection::new(DEPOT);
        selection.request_origin_selection();
        selection.commit_point(GeoPoint::new(-6.1, 106.7));
        selection.request_destination_selection();
        selection.commit_point(GeoPoint::new(-6.2, 106.9));
        selection.request_origin_selection();

        selection.reset();

        assert_eq!(selection, Selection::new(DEPOT));
    }

    proptest! {
        #[test]
        fn prop_origin_commit_leaves_destination(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            dest_lat in -90.0f64..=90.0,
            dest_lon in -180.0f64..=180.0,
        ) {
            let mut selection = Selection::new(DEPOT);
            let destination = GeoPoint::new(dest_lat, dest_lon);
            selection.request_destination_selection();
            selection.commit_point(destination);

            let point = GeoPoint::new(lat, lon);
            selection.request_origin_selection();
            let outcome = selection.commit_point(point);

            prop_assert!(outcome.is_committed());
            prop_assert_eq!(selection.origin(), Some(point));
            prop_assert_eq!(selection.destination(), Some(destination));
            prop_assert_eq!(selection.mode(), SelectionMode::Idle);
        }
    }
}
