//! Platform services consumed by the navigation core.
//!
//! Route calculation and place search are asynchronous: a service receives
//! a request and later posts the matching completion event, carrying the
//! same [`RequestTicket`], into the event channel
//! ([`NavEvent::RouteCalculated`](crate::event::NavEvent::RouteCalculated),
//! [`NavEvent::SearchCompleted`](crate::event::NavEvent::SearchCompleted)).

use serde::{Deserialize, Serialize};

use crate::config::TransportMode;
use crate::geo::{Coordinate, SearchRegion};

/// Identifies one outstanding request. Tickets increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRequest {
    pub ticket: RequestTicket,
    pub source: Coordinate,
    pub destination: Coordinate,
    pub transport: TransportMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub ticket: RequestTicket,
    pub query: String,
    pub region: SearchRegion,
}

/// Route-calculation service.
pub trait RouteService {
    fn calculate(&mut self, request: RouteRequest);
}

/// Place-search service.
pub trait PlaceSearch {
    fn search(&mut self, request: SearchRequest);
}

/// On-screen text and speech output. Fire-and-forget.
pub trait GuidanceOutput {
    fn show_instruction(&mut self, text: &str);
    fn speak(&mut self, text: &str);
    fn clear_instruction(&mut self);
    /// User-visible status line for failures.
    fn show_status(&mut self, message: &str);
}

/// The services a controller talks to.
pub struct Services {
    pub routes: Box<dyn RouteService + Send>,
    pub places: Box<dyn PlaceSearch + Send>,
    pub guidance: Box<dyn GuidanceOutput + Send>,
}
