use serde::{Deserialize, Serialize};

use crate::geo::{CircularRegion, Coordinate};
use crate::notify::{NotificationContent, NotificationRequest, RegionTrigger};

/// A destination alarm: one region registration paired with one one-shot
/// notification request. Arming and disarming always change both sides
/// together, so neither can leak without the other through this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    pub identifier: String,
    pub region: CircularRegion,
    pub sound: String,
    pub message: String,
}

impl Alarm {
    /// Entry-triggered alarm around the given coordinate.
    pub fn entry_only(
        latitude: f64,
        longitude: f64,
        radius_m: f64,
        identifier: impl Into<String>,
        sound: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let identifier = identifier.into();
        let region = CircularRegion::entry_only(
            Coordinate::new(latitude, longitude),
            radius_m,
            identifier.clone(),
        );
        Self {
            identifier,
            region,
            sound: sound.into(),
            message: message.into(),
        }
    }

    /// The one-shot notification request this alarm registers. `app_name`
    /// becomes both the title and the category identifier.
    pub fn to_request(&self, app_name: &str) -> NotificationRequest {
        NotificationRequest::new(
            self.identifier.clone(),
            NotificationContent {
                title: app_name.to_string(),
                body: self.message.clone(),
                sound: self.sound.clone(),
                category: app_name.to_string(),
            },
            RegionTrigger {
                region: self.region.clone(),
                repeats: false,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_app_name_as_title_and_category() {
        let alarm = Alarm::entry_only(
            35.6586,
            139.7454,
            500.0,
            "NotifyByLocation",
            "NotifySound",
            "目的地付近です",
        );
        let request = alarm.to_request("NotifyByLocation");
        assert_eq!(request.identifier, "NotifyByLocation");
        assert_eq!(request.content.title, "NotifyByLocation");
        assert_eq!(request.content.category, "NotifyByLocation");
        assert_eq!(request.content.body, "目的地付近です");
        assert!(!request.trigger.repeats);
        assert_eq!(request.trigger.region.radius_m, 500.0);
    }
}
