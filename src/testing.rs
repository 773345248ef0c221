//! Recording fakes for the platform seams.
//!
//! Clones share their log, so a test keeps one handle and gives the other
//! to the code under test.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::event::{EventSender, NavEvent};
use crate::geo::Coordinate;
use crate::overlay::{MapSurface, Overlay, OverlayId, PlaceResult};
use crate::route::CandidateRoute;
use crate::services::{GuidanceOutput, PlaceSearch, RouteRequest, RouteService, SearchRequest};

#[derive(Debug, Default)]
struct SurfaceLog {
    live: BTreeMap<OverlayId, Overlay>,
    removed: Vec<OverlayId>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    log: Arc<Mutex<SurfaceLog>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.log.lock().live.len()
    }

    pub fn removed(&self) -> Vec<OverlayId> {
        self.log.lock().removed.clone()
    }

    pub fn polylines(&self) -> Vec<Vec<Coordinate>> {
        self.log
            .lock()
            .live
            .values()
            .filter_map(|o| match o {
                Overlay::Polyline { points } => Some(points.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn circles(&self) -> Vec<(Coordinate, f64)> {
        self.log
            .lock()
            .live
            .values()
            .filter_map(|o| match o {
                Overlay::Circle { center, radius_m } => Some((*center, *radius_m)),
                _ => None,
            })
            .collect()
    }

    pub fn markers(&self) -> Vec<(String, Option<String>)> {
        self.log
            .lock()
            .live
            .values()
            .filter_map(|o| match o {
                Overlay::Marker { title, subtitle, .. } => Some((title.clone(), subtitle.clone())),
                _ => None,
            })
            .collect()
    }
}

impl MapSurface for RecordingSurface {
    fn add_overlay(&mut self, id: OverlayId, overlay: &Overlay) {
        self.log.lock().live.insert(id, overlay.clone());
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        let mut log = self.log.lock();
        log.live.remove(&id);
        log.removed.push(id);
    }
}

#[derive(Debug, Default)]
struct GuidanceLog {
    instructions: Vec<String>,
    spoken: Vec<String>,
    statuses: Vec<String>,
    cleared: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingGuidance {
    log: Arc<Mutex<GuidanceLog>>,
}

impl RecordingGuidance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructions(&self) -> Vec<String> {
        self.log.lock().instructions.clone()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.log.lock().spoken.clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.log.lock().statuses.clone()
    }

    pub fn cleared(&self) -> usize {
        self.log.lock().cleared
    }
}

impl GuidanceOutput for RecordingGuidance {
    fn show_instruction(&mut self, text: &str) {
        self.log.lock().instructions.push(text.to_string());
    }

    fn speak(&mut self, text: &str) {
        self.log.lock().spoken.push(text.to_string());
    }

    fn clear_instruction(&mut self) {
        self.log.lock().cleared += 1;
    }

    fn show_status(&mut self, message: &str) {
        self.log.lock().statuses.push(message.to_string());
    }
}

/// Route service that only records requests; tests answer them by hand.
#[derive(Debug, Clone, Default)]
pub struct RecordingRoutes {
    requests: Arc<Mutex<Vec<RouteRequest>>>,
}

impl RecordingRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<RouteRequest> {
        self.requests.lock().clone()
    }
}

impl RouteService for RecordingRoutes {
    fn calculate(&mut self, request: RouteRequest) {
        self.requests.lock().push(request);
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingPlaces {
    requests: Arc<Mutex<Vec<SearchRequest>>>,
}

impl RecordingPlaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().clone()
    }
}

impl PlaceSearch for RecordingPlaces {
    fn search(&mut self, request: SearchRequest) {
        self.requests.lock().push(request);
    }
}

/// Route service answering every request with the same candidates.
pub struct ScriptedRoutes {
    pub sender: EventSender,
    pub candidates: Vec<CandidateRoute>,
}

impl RouteService for ScriptedRoutes {
    fn calculate(&mut self, request: RouteRequest) {
        let _ = self.sender.send(NavEvent::RouteCalculated {
            ticket: request.ticket,
            result: Ok(self.candidates.clone()),
        });
    }
}

/// Place search answering every request with the same places.
pub struct ScriptedPlaces {
    pub sender: EventSender,
    pub places: Vec<PlaceResult>,
}

impl PlaceSearch for ScriptedPlaces {
    fn search(&mut self, request: SearchRequest) {
        let _ = self.sender.send(NavEvent::SearchCompleted {
            ticket: request.ticket,
            result: Ok(self.places.clone()),
        });
    }
}
