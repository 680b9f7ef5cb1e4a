use log::info;

pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn record_alarm_armed(&self, identifier: &str, radius_m: f64) {
        info!("alarm {} armed, radius {:.0} m", identifier, radius_m);
    }

    pub fn record_delivery(&self, identifier: &str, timestamp: f64) {
        info!("notification {} delivered at {:.1}", identifier, timestamp);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
