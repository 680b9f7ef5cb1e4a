use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use notifycore::geo::{Coordinate, KM_PER_DEGREE};
use notifycore::prelude::LocationFix;

/// Configuration for generating a synthetic approach track.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Distance from the destination at the first fix, in meters.
    pub start_offset_m: f64,
    /// Direction from the destination toward the start point, in degrees.
    pub bearing_deg: f64,
    /// Interpolation steps between start and destination.
    pub steps: usize,
    /// Per-step positional jitter in meters.
    pub jitter_m: f64,
    pub seed: u64,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            start_offset_m: 3_000.0,
            bearing_deg: 45.0,
            steps: 40,
            jitter_m: 5.0,
            seed: 0,
        }
    }
}

/// Builds a one-fix-per-second walk from the configured offset down to
/// the destination. The final fix lands exactly on the destination, so a
/// track always ends inside any radius around it. Deterministic per seed.
pub fn build_track(destination: Coordinate, config: &TrackConfig) -> Vec<LocationFix> {
    let meters_per_deg_lat = KM_PER_DEGREE * 1_000.0;
    let meters_per_deg_lon = meters_per_deg_lat * destination.latitude.to_radians().cos();

    let bearing = config.bearing_deg.to_radians();
    let start = Coordinate::new(
        destination.latitude + (config.start_offset_m * bearing.cos()) / meters_per_deg_lat,
        destination.longitude + (config.start_offset_m * bearing.sin()) / meters_per_deg_lon,
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let steps = config.steps.max(1);
    let mut fixes = Vec::with_capacity(steps + 1);

    for step in 0..=steps {
        if step == steps {
            fixes.push(LocationFix::new(destination, step as f64));
            break;
        }

        let progress = step as f64 / steps as f64;
        let mut latitude = start.latitude + (destination.latitude - start.latitude) * progress;
        let mut longitude = start.longitude + (destination.longitude - start.longitude) * progress;
        if config.jitter_m > 0.0 {
            latitude += rng.gen_range(-config.jitter_m..config.jitter_m) / meters_per_deg_lat;
            longitude += rng.gen_range(-config.jitter_m..config.jitter_m) / meters_per_deg_lon;
        }
        fixes.push(LocationFix::new(Coordinate::new(latitude, longitude), step as f64));
    }

    fixes
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOWER: Coordinate = Coordinate {
        latitude: 35.6586,
        longitude: 139.7454,
    };

    #[test]
    fn track_has_one_fix_per_step_plus_arrival() {
        let config = TrackConfig::default();
        let track = build_track(TOWER, &config);
        assert_eq!(track.len(), config.steps + 1);
        assert_eq!(track.last().unwrap().coordinate, TOWER);
    }

    #[test]
    fn track_starts_near_the_configured_offset() {
        let config = TrackConfig {
            jitter_m: 0.0,
            ..TrackConfig::default()
        };
        let track = build_track(TOWER, &config);
        let start_distance = track[0].coordinate.distance_m(&TOWER);
        assert!(
            (start_distance - config.start_offset_m).abs() < 50.0,
            "got {}",
            start_distance
        );
    }

    #[test]
    fn tracks_are_deterministic_per_seed() {
        let config = TrackConfig::default();
        let a = build_track(TOWER, &config);
        let b = build_track(TOWER, &config);
        assert_eq!(a.len(), b.len());
        for (fix_a, fix_b) in a.iter().zip(&b) {
            assert_eq!(fix_a.coordinate, fix_b.coordinate);
        }
    }

    #[test]
    fn timestamps_advance_one_second_per_fix() {
        let track = build_track(TOWER, &TrackConfig::default());
        assert_eq!(track[0].timestamp, 0.0);
        assert_eq!(track[5].timestamp, 5.0);
    }
}
