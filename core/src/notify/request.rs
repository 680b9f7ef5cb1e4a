use serde::{Deserialize, Serialize};

use crate::geo::CircularRegion;

/// Visible payload of a local notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub sound: String,
    pub category: String,
}

/// Region-based trigger; `repeats: false` delivers at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionTrigger {
    pub region: CircularRegion,
    pub repeats: bool,
}

/// A notification request held in the pending store until its trigger fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub identifier: String,
    pub content: NotificationContent,
    pub trigger: RegionTrigger,
}

impl NotificationRequest {
    pub fn new(
        identifier: impl Into<String>,
        content: NotificationContent,
        trigger: RegionTrigger,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            content,
            trigger,
        }
    }
}
