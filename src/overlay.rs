//! Map overlays.
//!
//! The [`OverlayManager`] owns everything drawn on the map on behalf of the
//! navigation core: at most one route polyline, one circle per route step,
//! and the pins of the last place search. Step circles and step regions
//! are two views of the same steps, so the manager also owns the
//! [`GeofenceRegistry`] and creates and destroys both together.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::geofence::{GeofenceRegistry, RegionMonitor};
use crate::route::RouteStep;

/// Handle of an overlay added to the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlayId(pub u64);

/// An element drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    Polyline {
        points: Vec<Coordinate>,
    },
    Circle {
        center: Coordinate,
        radius_m: f64,
    },
    Marker {
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
        position: Coordinate,
    },
}

/// Platform map rendering surface.
pub trait MapSurface {
    fn add_overlay(&mut self, id: OverlayId, overlay: &Overlay);
    fn remove_overlay(&mut self, id: OverlayId);
}

/// A place returned by the search service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub coordinate: Coordinate,
}

pub struct OverlayManager<S, M> {
    surface: S,
    geofences: GeofenceRegistry<M>,
    next_id: u64,
    polyline: Option<OverlayId>,
    circles: Vec<OverlayId>,
    markers: Vec<(OverlayId, Coordinate)>,
}

impl<S: MapSurface, M: RegionMonitor> OverlayManager<S, M> {
    pub fn new(surface: S, geofences: GeofenceRegistry<M>) -> Self {
        Self {
            surface,
            geofences,
            next_id: 0,
            polyline: None,
            circles: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Replace the route polyline.
    pub fn show_route(&mut self, points: &[Coordinate]) {
        self.clear_polyline();
        let id = self.add(Overlay::Polyline {
            points: points.to_vec(),
        });
        self.polyline = Some(id);
    }

    /// Replace step circles and step regions with one of each per step.
    pub fn show_step_markers(&mut self, steps: &[RouteStep]) {
        self.clear_circles();
        self.geofences.register_step_regions(steps);

        let radius_m = self.geofences.radius_m();
        for step in steps {
            let id = self.add(Overlay::Circle {
                center: step.anchor,
                radius_m,
            });
            self.circles.push(id);
        }
    }

    /// Add one pin per result. Existing pins are kept.
    pub fn show_search_results(&mut self, items: &[PlaceResult]) {
        for item in items {
            let id = self.add(Overlay::Marker {
                title: item.name.clone(),
                subtitle: item.address.clone(),
                position: item.coordinate,
            });
            self.markers.push((id, item.coordinate));
        }
        debug!("Showing {} search results", items.len());
    }

    /// Remove pins, polyline, then step circles and regions.
    pub fn reset_all(&mut self) {
        self.clear_markers();
        self.clear_route();
    }

    /// Remove the polyline, step circles and step regions; pins stay.
    pub fn clear_route(&mut self) {
        self.clear_polyline();
        self.clear_circles();
    }

    /// Position of a pin added by [`show_search_results`](Self::show_search_results).
    pub fn marker_position(&self, id: OverlayId) -> Option<Coordinate> {
        self.markers
            .iter()
            .find(|(m, _)| *m == id)
            .map(|(_, c)| *c)
    }

    pub fn marker_ids(&self) -> Vec<OverlayId> {
        self.markers.iter().map(|(id, _)| *id).collect()
    }

    pub fn has_route(&self) -> bool {
        self.polyline.is_some()
    }

    pub fn circle_count(&self) -> usize {
        self.circles.len()
    }

    pub fn geofences(&self) -> &GeofenceRegistry<M> {
        &self.geofences
    }

    fn add(&mut self, overlay: Overlay) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        self.surface.add_overlay(id, &overlay);
        id
    }

    fn clear_markers(&mut self) {
        for (id, _) in self.markers.drain(..) {
            self.surface.remove_overlay(id);
        }
    }

    fn clear_polyline(&mut self) {
        if let Some(id) = self.polyline.take() {
            self.surface.remove_overlay(id);
        }
    }

    fn clear_circles(&mut self) {
        self.geofences.clear_all();
        for id in self.circles.drain(..) {
            self.surface.remove_overlay(id);
        }
    }
}
