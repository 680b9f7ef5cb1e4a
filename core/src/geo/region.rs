use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// A named circular geographic region with entry/exit trigger flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircularRegion {
    pub center: Coordinate,
    pub radius_m: f64,
    pub identifier: String,
    pub notify_on_entry: bool,
    pub notify_on_exit: bool,
}

impl CircularRegion {
    /// Entry-triggered region, the only kind the alarm flow registers.
    pub fn entry_only(center: Coordinate, radius_m: f64, identifier: impl Into<String>) -> Self {
        Self {
            center,
            radius_m,
            identifier: identifier.into(),
            notify_on_entry: true,
            notify_on_exit: false,
        }
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.center.distance_m(coordinate) <= self.radius_m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_points_inside_the_radius() {
        let region = CircularRegion::entry_only(Coordinate::new(35.6586, 139.7454), 500.0, "dest");
        // Roughly 200 m north of the center.
        let near = Coordinate::new(35.6604, 139.7454);
        assert!(region.contains(&near));
        assert!(region.contains(&region.center));
    }

    #[test]
    fn rejects_points_outside_the_radius() {
        let region = CircularRegion::entry_only(Coordinate::new(35.6586, 139.7454), 500.0, "dest");
        // Tokyo Station, about 3 km away.
        let far = Coordinate::new(35.6812, 139.7671);
        assert!(!region.contains(&far));
    }

    #[test]
    fn entry_only_sets_trigger_flags() {
        let region = CircularRegion::entry_only(Coordinate::default(), 100.0, "r");
        assert!(region.notify_on_entry);
        assert!(!region.notify_on_exit);
    }
}
