use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::notify::DeliveredNotification;

/// Movement profile applied while continuous location updates run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivityType {
    Other,
    AutomotiveNavigation,
    OtherNavigation,
    Fitness,
}

/// Configuration applied when continuous location updates start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub desired_accuracy_m: f64,
    pub distance_filter_m: f64,
    pub activity: ActivityType,
    pub allows_background_updates: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            desired_accuracy_m: 10.0,
            distance_filter_m: 10.0,
            activity: ActivityType::AutomotiveNavigation,
            allows_background_updates: true,
        }
    }
}

/// Whether continuous location updates are running.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    Armed,
    Idle,
}

/// A single position report fed into the monitor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub timestamp: f64,
}

impl LocationFix {
    pub fn new(coordinate: Coordinate, timestamp: f64) -> Self {
        Self {
            coordinate,
            timestamp,
        }
    }
}

/// Boundary-crossing kinds a monitored region can report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RegionTransition {
    Entered,
    Exited,
}

/// A region boundary crossing observed while processing a fix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionEvent {
    pub identifier: String,
    pub transition: RegionTransition,
    pub fix: LocationFix,
}

/// Common error type for engine operations.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("notifications not authorized: {0}")]
    NotAuthorized(String),
    #[error("no pending request: {0}")]
    UnknownRequest(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Receiver invoked the moment a notification is delivered.
pub trait NotificationSink: Send + Sync {
    fn notification_delivered(&self, notification: &DeliveredNotification);
}
