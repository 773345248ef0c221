pub mod android_jni;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod geo;
pub mod geofence;
pub mod overlay;
pub mod replay;
pub mod route;
pub mod services;

#[cfg(test)]
mod testing;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
