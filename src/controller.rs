//! Navigation state machine.
//!
//! The controller is the only owner of navigation state: the last position
//! fix, the active route, the map overlays and the monitored step regions.
//! Every input reaches it through [`NavigationController::handle`], which
//! is driven from a single thread by [`crate::event::EventLoop`], so
//! transitions never interleave.
//!
//! ```text
//! Idle --request_directions--> RouteRequested --route_calculated(ok)--> Navigating
//!                                    |                                      |
//!                                    +--route_calculated(err)--> Idle       +--region_entered--> Navigating
//! any --submit_search / clear--> Idle
//! ```

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{AdvancePolicy, NavConfig};
use crate::error::{NavError, Result};
use crate::event::NavEvent;
use crate::geo::{Coordinate, SearchRegion};
use crate::geofence::{GeofenceRegistry, RegionMonitor};
use crate::overlay::{MapSurface, OverlayId, OverlayManager, PlaceResult};
use crate::route::{CandidateRoute, Route, RouteModel};
use crate::services::{RequestTicket, RouteRequest, SearchRequest, Services};

/// A position fix from the positioning service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub coordinate: Coordinate,
    /// Heading in degrees, when the device can determine it.
    #[serde(default)]
    pub heading: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavState {
    /// No destination chosen.
    Idle,
    /// Waiting for the route service to answer `ticket`.
    RouteRequested {
        ticket: RequestTicket,
        destination: Coordinate,
    },
    /// A route is active; the step index lives in the route model.
    Navigating,
}

pub struct NavigationController<S, M> {
    config: NavConfig,
    overlays: OverlayManager<S, M>,
    route: RouteModel,
    services: Services,
    state: NavState,
    position: Option<Fix>,
    pending_search: Option<RequestTicket>,
    next_ticket: u64,
}

impl<S: MapSurface, M: RegionMonitor> NavigationController<S, M> {
    pub fn new(config: NavConfig, surface: S, monitor: M, services: Services) -> Self {
        let geofences = GeofenceRegistry::new(monitor, &config);
        Self {
            overlays: OverlayManager::new(surface, geofences),
            config,
            route: RouteModel::new(),
            services,
            state: NavState::Idle,
            position: None,
            pending_search: None,
            next_ticket: 0,
        }
    }

    /// Apply one event. Failures become a status message and a log record.
    pub fn handle(&mut self, event: NavEvent) {
        let result = match event {
            NavEvent::LocationUpdated(fix) => {
                self.update_location(fix);
                Ok(())
            }
            NavEvent::RegionEntered(id) => self.region_entered(&id),
            NavEvent::SearchSubmitted(query) => self.submit_search(&query).map(|_| ()),
            NavEvent::SearchCompleted { ticket, result } => self.search_completed(ticket, result),
            NavEvent::MarkerSelected(id) => self.select_marker(id).map(|_| ()),
            NavEvent::DirectionsRequested(destination) => {
                self.request_directions(destination).map(|_| ())
            }
            NavEvent::RouteCalculated { ticket, result } => self.route_calculated(ticket, result),
            NavEvent::Clear => {
                self.clear();
                Ok(())
            }
            NavEvent::Shutdown => Ok(()),
        };

        match result {
            Ok(()) => {}
            Err(NavError::StaleGeofenceEvent(id)) => {
                debug!("Ignoring entry for region {id}");
            }
            Err(e) => {
                warn!("{e}");
                self.services.guidance.show_status(&e.to_string());
            }
        }
    }

    pub fn update_location(&mut self, fix: Fix) {
        self.position = Some(fix);
    }

    /// Start a fresh place search around the current position.
    ///
    /// Clears the whole map and supersedes any pending route request.
    pub fn submit_search(&mut self, query: &str) -> Result<RequestTicket> {
        let center = self.current_coordinate()?;

        self.reset();
        let ticket = self.issue_ticket();
        self.pending_search = Some(ticket);

        debug!("Searching for {query:?} ({ticket:?})");
        self.services.places.search(SearchRequest {
            ticket,
            query: query.to_string(),
            region: SearchRegion::around(center, self.config.search_span_deg),
        });
        Ok(ticket)
    }

    /// Completion of a place search. Late results of superseded searches
    /// are dropped.
    pub fn search_completed(
        &mut self,
        ticket: RequestTicket,
        result: std::result::Result<Vec<PlaceResult>, String>,
    ) -> Result<()> {
        if self.pending_search != Some(ticket) {
            debug!("Dropping superseded search results ({ticket:?})");
            return Ok(());
        }
        self.pending_search = None;

        let places = result.map_err(NavError::SearchFailed)?;
        if places.is_empty() {
            return Err(NavError::SearchFailed("no results".to_string()));
        }

        self.overlays.show_search_results(&places);
        Ok(())
    }

    /// Request a route to the pin `id`.
    pub fn select_marker(&mut self, id: OverlayId) -> Result<RequestTicket> {
        let destination = self
            .overlays
            .marker_position(id)
            .ok_or(NavError::UnknownMarker(id.0))?;
        self.request_directions(destination)
    }

    /// Request a route from the current position to `destination`.
    ///
    /// The previous route, its circles, its regions and its instruction text
    /// are removed; search pins stay so another one can be picked.
    pub fn request_directions(&mut self, destination: Coordinate) -> Result<RequestTicket> {
        let source = self.current_coordinate()?;

        self.overlays.clear_route();
        self.route.clear();
        self.services.guidance.clear_instruction();
        let ticket = self.issue_ticket();
        self.state = NavState::RouteRequested {
            ticket,
            destination,
        };

        debug!("Requesting route ({ticket:?})");
        self.services.routes.calculate(RouteRequest {
            ticket,
            source,
            destination,
            transport: self.config.transport,
        });
        Ok(ticket)
    }

    /// Completion of a route request. Only the outstanding ticket is
    /// accepted; anything else was superseded and is dropped.
    pub fn route_calculated(
        &mut self,
        ticket: RequestTicket,
        result: std::result::Result<Vec<CandidateRoute>, String>,
    ) -> Result<()> {
        match self.state {
            NavState::RouteRequested { ticket: pending, .. } if pending == ticket => {}
            _ => {
                debug!("Dropping superseded route response ({ticket:?})");
                return Ok(());
            }
        }

        let accepted = result
            .map_err(NavError::RouteCalculationFailed)
            .and_then(Route::first_of);

        let route = match accepted {
            Ok(route) => route,
            Err(e) => {
                self.state = NavState::Idle;
                self.overlays.clear_route();
                return Err(e);
            }
        };

        info!("Route accepted with {} steps", route.len());
        self.overlays.show_route(route.polyline());
        self.overlays.show_step_markers(route.steps());
        self.route.set_route(route);
        self.state = NavState::Navigating;
        self.render(0);
        Ok(())
    }

    /// Geofence entry reported by the positioning service.
    ///
    /// Advances only to a later step of the active route, as allowed by
    /// the configured [`AdvancePolicy`]. Anything else is stale.
    pub fn region_entered(&mut self, id: &str) -> Result<()> {
        let stale = || NavError::StaleGeofenceEvent(id.to_string());

        if self.state != NavState::Navigating {
            return Err(stale());
        }
        let current = self.route.current().ok_or_else(stale)?;
        let step = self.overlays.geofences().step_for(id).ok_or_else(stale)?;

        let accepted = match self.config.advance {
            AdvancePolicy::NextOnly => step == current + 1,
            AdvancePolicy::AllowSkip => step > current,
        };
        if !accepted {
            return Err(stale());
        }

        self.route.advance_to(step);
        info!("Advanced to step {step}");
        if step + 1 == self.route.len() {
            info!("Arrived at destination");
        }
        self.render(step);
        Ok(())
    }

    /// Drop the route and everything on the map.
    pub fn clear(&mut self) {
        self.reset();
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn current_step(&self) -> Option<usize> {
        match self.state {
            NavState::Navigating => self.route.current(),
            _ => None,
        }
    }

    pub fn position(&self) -> Option<Fix> {
        self.position
    }

    pub fn route_model(&self) -> &RouteModel {
        &self.route
    }

    pub fn overlays(&self) -> &OverlayManager<S, M> {
        &self.overlays
    }

    fn reset(&mut self) {
        self.overlays.reset_all();
        self.route.clear();
        self.services.guidance.clear_instruction();
        self.state = NavState::Idle;
        self.pending_search = None;
    }

    fn render(&mut self, index: usize) {
        let text = self.route.instruction_for(index);
        self.services.guidance.show_instruction(&text);
        self.services.guidance.speak(&text);
    }

    fn current_coordinate(&self) -> Result<Coordinate> {
        self.position
            .map(|fix| fix.coordinate)
            .ok_or(NavError::LocationUnavailable)
    }

    fn issue_ticket(&mut self) -> RequestTicket {
        self.next_ticket += 1;
        RequestTicket(self.next_ticket)
    }
}
