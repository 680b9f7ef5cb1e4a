//! Geofencing and notification core for the Rust NotifyByLocation platform.
//!
//! The modules mirror the destination-alarm flow while providing safe
//! abstractions: circular regions with entry detection, a notification
//! store with pending and delivered lanes, and a location engine that
//! arms the region monitor and the notification request as one alarm.

pub mod engine;
pub mod geo;
pub mod notify;
pub mod prelude;
pub mod telemetry;

pub use prelude::{EngineError, EngineResult, LocationFix, NotificationSink, Status};
