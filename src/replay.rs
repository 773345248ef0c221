//! Position replay from recorded GPX tracks.
//!
//! Stands in for the platform positioning service: each track point is
//! sent as a [`NavEvent::LocationUpdated`], and the shared
//! [`SimulatedMonitor`] turns it into [`NavEvent::RegionEntered`] events
//! for any step region the point lands in.

use std::io::Read;

use log::debug;

use crate::controller::Fix;
use crate::error::{NavError, Result};
use crate::event::{EventSender, NavEvent};
use crate::geo::{bearing, Coordinate};
use crate::geofence::SimulatedMonitor;

/// Read every track point of a GPX file, in order.
///
/// Multi-segment and multi-track files are flattened. Files without track
/// points fall back to their route points.
pub fn load_track<R: Read>(reader: R) -> Result<Vec<Coordinate>> {
    let gpx = gpx::read(reader).map_err(|e| NavError::Track(format!("GPX parse error: {e}")))?;

    let mut points: Vec<Coordinate> = gpx
        .tracks
        .iter()
        .flat_map(|t| t.segments.iter())
        .flat_map(|seg| seg.points.iter())
        .map(|wp| Coordinate::new(wp.point().y(), wp.point().x()))
        .collect();

    if points.is_empty() {
        points = gpx
            .routes
            .iter()
            .flat_map(|r| r.points.iter())
            .map(|wp| Coordinate::new(wp.point().y(), wp.point().x()))
            .collect();
    }

    if points.is_empty() {
        return Err(NavError::Track("no track points".to_string()));
    }
    Ok(points)
}

/// Replays a track into the event channel.
pub struct Replay {
    points: Vec<Coordinate>,
    monitor: SimulatedMonitor,
    events: EventSender,
}

impl Replay {
    pub fn new(points: Vec<Coordinate>, monitor: SimulatedMonitor, events: EventSender) -> Self {
        Self {
            points,
            monitor,
            events,
        }
    }

    /// Send every point, followed by the entries it triggers.
    ///
    /// Heading is the bearing towards the next point. Returns the number of
    /// events sent.
    pub fn run(&self) -> Result<usize> {
        let mut sent = 0;

        for (i, point) in self.points.iter().enumerate() {
            let heading = self.points.get(i + 1).map(|next| bearing(point, next));
            self.send(NavEvent::LocationUpdated(Fix {
                coordinate: *point,
                heading,
            }))?;
            sent += 1;

            for id in self.monitor.observe(point) {
                debug!("Replay entered region {id}");
                self.send(NavEvent::RegionEntered(id))?;
                sent += 1;
            }
        }

        Ok(sent)
    }

    fn send(&self, event: NavEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| NavError::Track("event loop closed".to_string()))
    }
}
