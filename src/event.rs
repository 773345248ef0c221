//! Event channel and the navigation event loop.
//!
//! Positioning updates, geofence entries, user actions and service
//! completions all arrive from independent sources. They are sent into a
//! single mpsc channel and applied one at a time by the event loop thread,
//! which owns the [`NavigationController`].

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use log::{debug, info};

use crate::controller::{Fix, NavigationController};
use crate::geo::Coordinate;
use crate::geofence::RegionMonitor;
use crate::overlay::{MapSurface, OverlayId, PlaceResult};
use crate::route::CandidateRoute;
use crate::services::RequestTicket;

/// Inputs to the navigation state machine.
#[derive(Debug, Clone)]
pub enum NavEvent {
    /// New position fix.
    LocationUpdated(Fix),

    /// The device entered the monitored region with this identifier.
    RegionEntered(String),

    /// User submitted a place search.
    SearchSubmitted(String),

    /// Place search finished.
    SearchCompleted {
        ticket: RequestTicket,
        result: Result<Vec<PlaceResult>, String>,
    },

    /// Detail control of a search pin was activated.
    MarkerSelected(OverlayId),

    /// Directions to an explicit coordinate.
    DirectionsRequested(Coordinate),

    /// Route calculation finished.
    RouteCalculated {
        ticket: RequestTicket,
        result: Result<Vec<CandidateRoute>, String>,
    },

    /// Drop the route and clear the map.
    Clear,

    /// Stop the event loop.
    Shutdown,
}

/// Sender end of the event channel (held by every event source).
pub type EventSender = mpsc::Sender<NavEvent>;

/// Receiver end of the event channel (held by the event loop).
pub type EventReceiver = mpsc::Receiver<NavEvent>;

/// Create a new event channel pair.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::channel()
}

/// Apply events until `Shutdown` arrives or every sender is gone.
///
/// Returns the number of events applied.
pub fn run<S, M>(controller: &mut NavigationController<S, M>, events: &EventReceiver) -> usize
where
    S: MapSurface,
    M: RegionMonitor,
{
    let mut handled = 0;
    for event in events.iter() {
        if matches!(event, NavEvent::Shutdown) {
            debug!("Event loop shutdown requested");
            break;
        }
        controller.handle(event);
        handled += 1;
    }
    handled
}

/// Navigation event loop running on its own thread.
pub struct EventLoop<S, M> {
    handle: JoinHandle<NavigationController<S, M>>,
}

impl<S, M> EventLoop<S, M>
where
    S: MapSurface + Send + 'static,
    M: RegionMonitor + Send + 'static,
{
    /// Spawn the loop. The controller is handed back by [`join`](Self::join).
    pub fn spawn(
        mut controller: NavigationController<S, M>,
        events: EventReceiver,
    ) -> std::io::Result<Self> {
        let handle = thread::Builder::new()
            .name("navigation".into())
            .spawn(move || {
                info!("Navigation event loop started");
                let handled = run(&mut controller, &events);
                info!("Navigation event loop stopped after {handled} events");
                controller
            })?;

        Ok(Self { handle })
    }

    /// Wait for the loop to stop. `None` if the loop thread panicked.
    pub fn join(self) -> Option<NavigationController<S, M>> {
        self.handle.join().ok()
    }
}
