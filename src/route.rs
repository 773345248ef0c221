//! Route steps and the turn-by-turn instruction model.
//!
//! A [`Route`] is built from the first candidate returned by the route
//! service and replaced wholesale on every new destination. The
//! [`RouteModel`] tracks which step the user is on and produces the
//! text that is shown and spoken for it. Platform-agnostic.

use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};
use crate::geo::Coordinate;

/// One maneuver as delivered by the route service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateStep {
    pub instruction: String,
    /// Distance of this leg in meters.
    pub distance_m: f64,
    /// Point the maneuver is anchored to.
    pub anchor: Coordinate,
    #[serde(default)]
    pub geometry: Vec<Coordinate>,
}

/// One route option as delivered by the route service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRoute {
    pub steps: Vec<CandidateStep>,
    #[serde(default)]
    pub polyline: Vec<Coordinate>,
}

/// A single step of an accepted route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStep {
    /// Position in the route, also the geofence identifier suffix.
    pub index: usize,
    pub instruction: String,
    pub distance_m: f64,
    pub anchor: Coordinate,
    pub geometry: Vec<Coordinate>,
}

/// An accepted route. Steps are in navigation order and never reordered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    steps: Vec<RouteStep>,
    polyline: Vec<Coordinate>,
}

impl Route {
    /// Accept a candidate, numbering its steps in order.
    ///
    /// Candidates without steps are rejected.
    pub fn from_candidate(candidate: CandidateRoute) -> Result<Self> {
        if candidate.steps.is_empty() {
            return Err(NavError::RouteCalculationFailed(
                "route has no steps".to_string(),
            ));
        }

        let steps = candidate
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, s)| RouteStep {
                index,
                instruction: s.instruction,
                distance_m: s.distance_m,
                anchor: s.anchor,
                geometry: s.geometry,
            })
            .collect();

        Ok(Self {
            steps,
            polyline: candidate.polyline,
        })
    }

    /// Pick the first candidate of a service response.
    ///
    /// No ranking is applied: candidate #0 is taken as the route to use.
    pub fn first_of(candidates: Vec<CandidateRoute>) -> Result<Self> {
        let first = candidates.into_iter().next().ok_or_else(|| {
            NavError::RouteCalculationFailed("no candidate routes".to_string())
        })?;
        Self::from_candidate(first)
    }

    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    pub fn polyline(&self) -> &[Coordinate] {
        &self.polyline
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Holds the active route and the current step index.
#[derive(Debug, Default)]
pub struct RouteModel {
    route: Option<Route>,
    current: usize,
}

impl RouteModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active route and restart at step 0.
    pub fn set_route(&mut self, route: Route) {
        self.route = Some(route);
        self.current = 0;
    }

    pub fn clear(&mut self) {
        self.route = None;
        self.current = 0;
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.route.is_some()
    }

    /// Current step index, or `None` when no route is active.
    pub fn current(&self) -> Option<usize> {
        self.route.as_ref().map(|_| self.current)
    }

    pub fn len(&self) -> usize {
        self.route.as_ref().map_or(0, Route::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Instruction text for step `index`.
    ///
    /// The final step yields its own instruction. Any other step pairs its
    /// instruction with the distance of the following leg:
    /// `"<instruction> and move <next distance> meters"`.
    ///
    /// Panics if no route is active or `index` is out of range.
    pub fn instruction_for(&self, index: usize) -> String {
        let steps = self.active_steps();
        assert!(index < steps.len(), "step {index} out of range ({})", steps.len());

        if index == steps.len() - 1 {
            steps[index].instruction.clone()
        } else {
            format!(
                "{} and move {} meters",
                steps[index].instruction,
                steps[index + 1].distance_m
            )
        }
    }

    /// Move to step `index`. The caller checks that the move is legitimate.
    ///
    /// Panics if no route is active or `index` is out of range.
    pub fn advance_to(&mut self, index: usize) {
        let len = self.active_steps().len();
        assert!(index < len, "cannot advance to step {index} of {len}");
        self.current = index;
    }

    /// Instruction text for every step, in order.
    pub fn instructions(&self) -> Vec<String> {
        (0..self.len()).map(|i| self.instruction_for(i)).collect()
    }

    fn active_steps(&self) -> &[RouteStep] {
        match &self.route {
            Some(route) => route.steps(),
            None => panic!("no active route"),
        }
    }
}

/// Instruction texts for a route given as `CandidateRoute` JSON.
///
/// Returns a JSON array of strings, one per step. Used across the JNI
/// boundary.
pub fn instructions_json(route_json: &str) -> Result<String> {
    let candidate: CandidateRoute = serde_json::from_str(route_json)
        .map_err(|e| NavError::RouteCalculationFailed(format!("invalid route JSON: {e}")))?;

    let mut model = RouteModel::new();
    model.set_route(Route::from_candidate(candidate)?);
    serde_json::to_string(&model.instructions())
        .map_err(|e| NavError::RouteCalculationFailed(format!("cannot encode instructions: {e}")))
}
