use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters used for great-circle distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Kilometers covered by one degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in meters (haversine).
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        let lat_a = self.latitude.to_radians();
        let lat_b = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

/// Viewport span in degrees covering roughly `km` kilometers.
pub fn span_for_km(km: f64) -> f64 {
    km / KM_PER_DEGREE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let tower = Coordinate::new(35.6586, 139.7454);
        assert_eq!(tower.distance_m(&tower), 0.0);
    }

    #[test]
    fn distance_tower_to_station_is_about_three_km() {
        let tower = Coordinate::new(35.6586, 139.7454);
        let station = Coordinate::new(35.6812, 139.7671);
        let distance = tower.distance_m(&station);
        assert!(distance > 2_900.0 && distance < 3_500.0, "got {}", distance);
    }

    #[test]
    fn span_of_one_km_is_one_111th_degree() {
        assert!((span_for_km(1.0) - 1.0 / 111.0).abs() < 1e-12);
    }
}
