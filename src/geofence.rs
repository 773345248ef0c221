//! Geofenced step regions.
//!
//! Every step of the active route gets one circular region centred on its
//! anchor. The platform's region monitor watches them and reports entries
//! back through [`NavEvent::RegionEntered`](crate::event::NavEvent).
//! Monitoring capacity is limited on real devices, so the registry always
//! tears down the previous set before registering a new one.

use std::collections::HashSet;
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;
use serde::Serialize;

use crate::config::NavConfig;
use crate::geo::{within_radius, Coordinate};
use crate::route::RouteStep;

/// A circular region monitored for one route step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoredRegion {
    pub id: String,
    pub step_index: usize,
    pub center: Coordinate,
    pub radius_m: f64,
}

/// Platform region-monitoring service.
///
/// Calls are fire-and-forget: a device that cannot monitor regions
/// silently drops them.
pub trait RegionMonitor {
    fn start_monitoring(&mut self, region: &MonitoredRegion);
    fn stop_monitoring(&mut self, id: &str);
}

/// Owns the set of regions currently registered with the monitor.
pub struct GeofenceRegistry<M> {
    monitor: M,
    radius_m: f64,
    id_prefix: String,
    regions: Vec<MonitoredRegion>,
}

impl<M: RegionMonitor> GeofenceRegistry<M> {
    pub fn new(monitor: M, config: &NavConfig) -> Self {
        Self {
            monitor,
            radius_m: config.geofence_radius_m,
            id_prefix: config.region_id_prefix.clone(),
            regions: Vec::new(),
        }
    }

    /// Replace the monitored set with one region per step.
    pub fn register_step_regions(&mut self, steps: &[RouteStep]) {
        self.clear_all();

        for step in steps {
            let region = MonitoredRegion {
                id: self.region_id(step.index),
                step_index: step.index,
                center: step.anchor,
                radius_m: self.radius_m,
            };
            self.monitor.start_monitoring(&region);
            self.regions.push(region);
        }

        debug!("Monitoring {} step regions", self.regions.len());
    }

    /// Stop monitoring every registered region. No-op when none are active.
    pub fn clear_all(&mut self) {
        for region in self.regions.drain(..) {
            self.monitor.stop_monitoring(&region.id);
        }
    }

    /// Step index for a region id, if it belongs to the current set.
    pub fn step_for(&self, id: &str) -> Option<usize> {
        self.regions
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.step_index)
    }

    pub fn regions(&self) -> &[MonitoredRegion] {
        &self.regions
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn monitor(&self) -> &M {
        &self.monitor
    }

    fn region_id(&self, index: usize) -> String {
        format!("{}{}", self.id_prefix, index)
    }
}

#[derive(Debug, Default)]
struct SimulatedState {
    regions: Vec<MonitoredRegion>,
    inside: HashSet<String>,
}

/// Software region monitor fed with position fixes.
///
/// Clones share state, so one handle can be given to the controller while
/// another observes positions (see [`crate::replay`]). A newly registered
/// region counts as "outside" until a fix lands in it.
#[derive(Debug, Clone, Default)]
pub struct SimulatedMonitor {
    state: Arc<Mutex<SimulatedState>>,
}

impl SimulatedMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fix and return the ids of regions entered by it.
    pub fn observe(&self, position: &Coordinate) -> Vec<String> {
        let mut state = self.state.lock();
        let SimulatedState { regions, inside } = &mut *state;
        let mut entered = Vec::new();

        for region in regions.iter() {
            let now_inside = within_radius(position, &region.center, region.radius_m);
            if now_inside {
                if inside.insert(region.id.clone()) {
                    entered.push(region.id.clone());
                }
            } else {
                inside.remove(&region.id);
            }
        }

        entered
    }

    /// Ids currently monitored, in registration order.
    pub fn monitored_ids(&self) -> Vec<String> {
        self.state.lock().regions.iter().map(|r| r.id.clone()).collect()
    }
}

impl RegionMonitor for SimulatedMonitor {
    fn start_monitoring(&mut self, region: &MonitoredRegion) {
        let mut state = self.state.lock();
        state.regions.retain(|r| r.id != region.id);
        state.inside.remove(&region.id);
        state.regions.push(region.clone());
    }

    fn stop_monitoring(&mut self, id: &str) {
        let mut state = self.state.lock();
        state.regions.retain(|r| r.id != id);
        state.inside.remove(id);
    }
}
