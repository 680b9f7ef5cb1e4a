use std::collections::HashMap;

use crate::geo::CircularRegion;
use crate::prelude::{LocationFix, MonitorConfig, RegionEvent, RegionTransition, Status};
use crate::telemetry::log::LogManager;

struct MonitoredRegion {
    region: CircularRegion,
    // None until the first fix determines which side of the boundary we are on.
    inside: Option<bool>,
}

/// Continuous-update and named-region monitoring state for one device.
pub struct LocationMonitor {
    config: MonitorConfig,
    status: Status,
    when_in_use_granted: bool,
    regions: HashMap<String, MonitoredRegion>,
    last_fix: Option<LocationFix>,
    updates_received: usize,
    logger: LogManager,
}

impl LocationMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            status: Status::Idle,
            when_in_use_granted: false,
            regions: HashMap::new(),
            last_fix: None,
            updates_received: 0,
            logger: LogManager::new(),
        }
    }

    pub fn request_when_in_use(&mut self) {
        self.when_in_use_granted = true;
    }

    pub fn when_in_use_granted(&self) -> bool {
        self.when_in_use_granted
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Starts continuous updates, optionally monitoring `region` as well.
    /// Idempotent: a second call while updating changes nothing, including
    /// the passed region.
    pub fn start_updating(&mut self, region: Option<CircularRegion>) {
        if self.status == Status::Armed {
            return;
        }
        self.status = Status::Armed;
        self.logger.record(&format!(
            "location updates started, accuracy {:.0} m, filter {:.0} m",
            self.config.desired_accuracy_m, self.config.distance_filter_m
        ));

        if let Some(region) = region {
            self.start_monitoring(region);
        }
    }

    /// Stops continuous updates. Registered region monitors stay in place.
    pub fn stop_updating(&mut self) {
        self.status = Status::Idle;
        self.last_fix = None;
        self.logger.record("location updates stopped");
    }

    /// Registers the region, replacing any monitor with the same identifier.
    pub fn start_monitoring(&mut self, region: CircularRegion) {
        self.logger
            .record(&format!("monitoring region {}", region.identifier));
        self.regions.insert(
            region.identifier.clone(),
            MonitoredRegion {
                region,
                inside: None,
            },
        );
    }

    /// Stops monitoring the named region; when no monitors remain, also
    /// stops continuous updates.
    pub fn stop_monitoring(&mut self, identifier: &str) {
        self.regions.remove(identifier);
        if self.regions.is_empty() {
            self.stop_updating();
        }
    }

    pub fn monitored_identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self.regions.keys().cloned().collect();
        identifiers.sort();
        identifiers
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn updates_received(&self) -> usize {
        self.updates_received
    }

    /// Feeds one fix through the monitor. Boundary transitions are always
    /// evaluated; the distance filter only throttles what counts as a
    /// location update. Ignored entirely while updates are stopped.
    pub fn push_fix(&mut self, fix: LocationFix) -> Vec<RegionEvent> {
        if self.status != Status::Armed {
            return Vec::new();
        }

        let mut events = Vec::new();
        for entry in self.regions.values_mut() {
            let inside_now = entry.region.contains(&fix.coordinate);
            let transition = match entry.inside {
                // First determination inside the region counts as an entry.
                None if inside_now => Some(RegionTransition::Entered),
                Some(false) if inside_now => Some(RegionTransition::Entered),
                Some(true) if !inside_now => Some(RegionTransition::Exited),
                _ => None,
            };
            entry.inside = Some(inside_now);

            if let Some(transition) = transition {
                let fires = match transition {
                    RegionTransition::Entered => entry.region.notify_on_entry,
                    RegionTransition::Exited => entry.region.notify_on_exit,
                };
                if fires {
                    events.push(RegionEvent {
                        identifier: entry.region.identifier.clone(),
                        transition,
                        fix,
                    });
                }
            }
        }

        let passes_filter = match self.last_fix {
            Some(last) => {
                fix.coordinate.distance_m(&last.coordinate) >= self.config.distance_filter_m
            }
            None => true,
        };
        if passes_filter {
            self.last_fix = Some(fix);
            self.updates_received += 1;
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;

    fn monitor() -> LocationMonitor {
        LocationMonitor::new(MonitorConfig::default())
    }

    fn tower_region(identifier: &str) -> CircularRegion {
        CircularRegion::entry_only(Coordinate::new(35.6586, 139.7454), 500.0, identifier)
    }

    fn fix(latitude: f64, longitude: f64, timestamp: f64) -> LocationFix {
        LocationFix::new(Coordinate::new(latitude, longitude), timestamp)
    }

    #[test]
    fn start_updating_is_idempotent() {
        let mut monitor = monitor();
        monitor.start_updating(None);
        assert_eq!(monitor.status(), Status::Armed);

        // Second start is a no-op: the passed region is not registered.
        monitor.start_updating(Some(tower_region("late")));
        assert_eq!(monitor.region_count(), 0);
    }

    #[test]
    fn re_registering_an_identifier_keeps_one_monitor() {
        let mut monitor = monitor();
        monitor.start_updating(Some(tower_region("dest")));
        monitor.start_monitoring(tower_region("dest"));
        assert_eq!(monitor.region_count(), 1);
    }

    #[test]
    fn stopping_the_last_region_stops_updates() {
        let mut monitor = monitor();
        monitor.start_updating(Some(tower_region("dest")));
        monitor.stop_monitoring("dest");
        assert_eq!(monitor.region_count(), 0);
        assert_eq!(monitor.status(), Status::Idle);
    }

    #[test]
    fn stop_updating_leaves_region_monitors_registered() {
        let mut monitor = monitor();
        monitor.start_updating(Some(tower_region("dest")));
        monitor.stop_updating();
        assert_eq!(monitor.status(), Status::Idle);
        assert_eq!(monitor.monitored_identifiers(), vec!["dest"]);
    }

    #[test]
    fn outside_to_inside_transition_produces_one_entry() {
        let mut monitor = monitor();
        monitor.start_updating(Some(tower_region("dest")));

        // ~3 km away, then at the center, then still inside.
        assert!(monitor.push_fix(fix(35.6812, 139.7671, 0.0)).is_empty());
        let events = monitor.push_fix(fix(35.6586, 139.7454, 1.0));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].transition, RegionTransition::Entered);
        assert!(monitor.push_fix(fix(35.6587, 139.7455, 2.0)).is_empty());
    }

    #[test]
    fn first_fix_inside_counts_as_entry() {
        let mut monitor = monitor();
        monitor.start_updating(Some(tower_region("dest")));
        let events = monitor.push_fix(fix(35.6586, 139.7454, 0.0));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn exits_produce_no_event_for_entry_only_regions() {
        let mut monitor = monitor();
        monitor.start_updating(Some(tower_region("dest")));
        monitor.push_fix(fix(35.6586, 139.7454, 0.0));
        let events = monitor.push_fix(fix(35.6812, 139.7671, 1.0));
        assert!(events.is_empty());
    }

    #[test]
    fn distance_filter_throttles_updates_not_transitions() {
        let mut monitor = monitor();
        monitor.start_updating(Some(tower_region("dest")));

        monitor.push_fix(fix(35.6812, 139.7671, 0.0));
        // A couple of meters from the last fix: filtered as an update.
        monitor.push_fix(fix(35.68121, 139.76711, 1.0));
        assert_eq!(monitor.updates_received(), 1);

        // The jump into the region still produces its entry event.
        let events = monitor.push_fix(fix(35.6586, 139.7454, 2.0));
        assert_eq!(events.len(), 1);
        assert_eq!(monitor.updates_received(), 2);
    }

    #[test]
    fn fixes_are_ignored_while_stopped() {
        let mut monitor = monitor();
        monitor.start_monitoring(tower_region("dest"));
        assert!(monitor.push_fix(fix(35.6586, 139.7454, 0.0)).is_empty());
    }
}
