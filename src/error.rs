//! Error types for the navigation core.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavError {
    /// No position fix has been received yet.
    #[error("Current location unavailable")]
    LocationUnavailable,

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Route calculation failed: {0}")]
    RouteCalculationFailed(String),

    /// Entry event for a region that is not part of the active route.
    #[error("Stale geofence event for region {0}")]
    StaleGeofenceEvent(String),

    #[error("Unknown map marker {0}")]
    UnknownMarker(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Track error: {0}")]
    Track(String),
}

pub type Result<T> = std::result::Result<T, NavError>;
