use serde::{Deserialize, Serialize};

use notifycore::geo::Coordinate;
use notifycore::notify::DeliveredNotification;
use notifycore::prelude::Status;

use crate::search::Completion;

/// A single marker rendered on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinItem {
    pub coordinate: Coordinate,
}

/// Map viewport: center plus span in degrees per axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapViewport {
    pub center: Coordinate,
    pub latitude_span_deg: f64,
    pub longitude_span_deg: f64,
}

impl MapViewport {
    pub fn new(center: Coordinate, span_deg: f64) -> Self {
        Self {
            center,
            latitude_span_deg: span_deg,
            longitude_span_deg: span_deg,
        }
    }
}

/// Published view state consumed by the map UI and the HTTP bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewState {
    pub location: String,
    pub search_query: String,
    pub completions: Vec<Completion>,
    pub status: Status,
    pub viewport: MapViewport,
    pub pins: Vec<PinItem>,
    pub latitude: f64,
    pub longitude: f64,
    pub delivered: Vec<DeliveredNotification>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            location: String::new(),
            search_query: String::new(),
            completions: Vec::new(),
            status: Status::Idle,
            // Wide initial viewport centered on the default destination.
            viewport: MapViewport::new(Coordinate::new(35.6586, 139.7454), 100.0),
            pins: Vec::new(),
            latitude: 0.0,
            longitude: 0.0,
            delivered: Vec::new(),
        }
    }
}
