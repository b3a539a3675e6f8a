//! The route search workflow
//!
//! [`RouteSearch`] owns the selection, the latest route result and the
//! in-flight bookkeeping. All mutation goes through its methods.
//!
//! Route computation is split into [`RouteSearch::begin_route`] and
//! [`RouteSearch::finish_route`] so that a UI loop can keep handling clicks,
//! selection toggles and resets while the request is outstanding.
//! [`RouteSearch::compute_route`] runs both halves back to back.
//!
//! Every started calculation and every reset bumps a generation counter. A
//! response is applied only if its generation is still current, so a reply
//! that arrives after a reset is dropped.

use crate::backend::RouteBackend;
use crate::error::{Result, RouteSearchError};
use crate::notify::Notification;
use crate::route::{RouteQuery, RouteResult};
use crate::selection::{CommitOutcome, Endpoint, IgnoreReason, Selection, SelectionMode};
use rutekita_api_client::endpoints::DijkstraResponse;
use rutekita_api_client::ApiResult;
use rutekita_geo::GeoPoint;
use rutekita_telemetry::{metrics, Timer};
use tracing::{debug, info, warn};

/// Ticket for a started calculation
///
/// Consumed by [`RouteSearch::finish_route`]; it cannot be finished twice.
#[derive(Debug)]
#[must_use = "a started calculation stays pending until finished"]
pub struct PendingRoute {
    generation: u64,
    query: RouteQuery,
    timer: Timer,
}

impl PendingRoute {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &RouteQuery {
        &self.query
    }
}

/// What happened to a calculation that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// A new result replaced the previous one
    Computed(RouteResult),
    /// Another calculation was already running; nothing was sent
    AlreadyCalculating,
    /// The workflow was reset while the request was in flight
    Discarded,
}

/// Route search state for one operator session
#[derive(Debug)]
pub struct RouteSearch {
    selection: Selection,
    result: Option<RouteResult>,
    generation: u64,
    calculating: bool,
    notifications: Vec<Notification>,
}

impl RouteSearch {
    /// Start with the origin at `depot`
    pub fn new(depot: GeoPoint) -> Self {
        Self {
            selection: Selection::new(depot),
            result: None,
            generation: 0,
            calculating: false,
            notifications: Vec::new(),
        }
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.selection.origin()
    }

    pub fn destination(&self) -> Option<GeoPoint> {
        self.selection.destination()
    }

    pub fn mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    pub fn depot(&self) -> GeoPoint {
        self.selection.depot()
    }

    /// Latest successful result, if any
    pub fn result(&self) -> Option<&RouteResult> {
        self.result.as_ref()
    }

    /// True while a calculation is outstanding
    pub fn is_calculating(&self) -> bool {
        self.calculating
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Notifications raised since the last call, oldest first
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn request_origin_selection(&mut self) {
        self.selection.request_origin_selection();
    }

    pub fn request_destination_selection(&mut self) {
        self.selection.request_destination_selection();
    }

    /// Forward a map click to the selection machine
    ///
    /// A successful commit raises a confirmation with the point rounded to
    /// four decimals.
    pub fn commit_point(&mut self, point: GeoPoint) -> CommitOutcome {
        let outcome = self.selection.commit_point(point);
        match outcome {
            CommitOutcome::Committed { endpoint, point } => {
                metrics().increment("selection.commits");
                let title = match endpoint {
                    Endpoint::Origin => "Origin set",
                    Endpoint::Destination => "Destination set",
                };
                self.notifications.push(Notification::success(title, point.label()));
            }
            CommitOutcome::Ignored(IgnoreReason::NotSelecting) => {
                debug!(point = %point, "Click ignored, no endpoint being picked");
            }
            CommitOutcome::Ignored(IgnoreReason::InvalidPoint) => {}
        }
        outcome
    }

    pub fn cancel(&mut self) {
        self.selection.cancel();
    }

    /// Back to the initial view
    ///
    /// Origin returns to the depot, destination and result are cleared and
    /// any outstanding calculation is orphaned: its response will be
    /// discarded when it arrives.
    pub fn reset(&mut self) {
        self.selection.reset();
        self.result = None;
        self.generation += 1;
        if self.calculating {
            debug!(generation = self.generation, "Reset during calculation, response will be discarded");
        }
        self.calculating = false;
    }

    /// Start a calculation
    ///
    /// Returns `Ok(None)` when one is already running. Fails with
    /// [`RouteSearchError::IncompleteSelection`] (and raises a warning) if an
    /// endpoint is missing; nothing is sent in either case.
    pub fn begin_route(&mut self) -> Result<Option<PendingRoute>> {
        if self.calculating {
            debug!(generation = self.generation, "Calculation already running, trigger ignored");
            return Ok(None);
        }

        let query = match RouteQuery::from_endpoints(self.origin(), self.destination()) {
            Ok(query) => query,
            Err(err) => {
                self.notifications.push(Notification::warning(
                    "Incomplete selection",
                    err.user_message(),
                ));
                return Err(err);
            }
        };

        self.generation += 1;
        self.calculating = true;
        metrics().increment("route.requests");
        info!(
            generation = self.generation,
            origin = %query.origin,
            destination = %query.destination,
            "Route calculation started"
        );

        Ok(Some(PendingRoute {
            generation: self.generation,
            query,
            timer: Timer::start("route.latency_ms"),
        }))
    }

    /// Apply the backend's answer to a started calculation
    ///
    /// A stale ticket changes nothing. A failure keeps the previous result and
    /// raises an error notice.
    pub fn finish_route(
        &mut self,
        pending: PendingRoute,
        response: ApiResult<DijkstraResponse>,
    ) -> Result<RouteOutcome> {
        let PendingRoute { generation, timer, .. } = pending;
        timer.stop();

        if generation != self.generation || !self.calculating {
            metrics().increment("route.stale");
            debug!(
                ticket = generation,
                current = self.generation,
                "Discarding response for superseded calculation"
            );
            return Ok(RouteOutcome::Discarded);
        }
        self.calculating = false;

        match response
            .map_err(RouteSearchError::from)
            .and_then(RouteResult::from_response)
        {
            Ok(result) => {
                metrics().increment("route.success");
                info!(
                    generation,
                    distance_km = result.distance_km,
                    points = result.path.len(),
                    geometric_km = result.path.length_km(),
                    "Route computed"
                );
                self.notifications.push(Notification::success(
                    "Route found",
                    format!("Distance: {:.2} km", result.distance_km),
                ));
                self.result = Some(result.clone());
                Ok(RouteOutcome::Computed(result))
            }
            Err(err) => {
                metrics().increment("route.failure");
                warn!(generation, error = %err, code = err.code() as u32, "Route calculation failed");
                self.notifications
                    .push(Notification::error("Route search failed", err.user_message()));
                Err(err)
            }
        }
    }

    /// Run a whole calculation against `backend`
    pub async fn compute_route<B: RouteBackend>(&mut self, backend: &B) -> Result<RouteOutcome> {
        let Some(pending) = self.begin_route()? else {
            return Ok(RouteOutcome::AlreadyCalculating);
        };
        let request = pending.query().to_request();
        let response = backend.shortest_path(&request).await;
        self.finish_route(pending, response)
    }
}
