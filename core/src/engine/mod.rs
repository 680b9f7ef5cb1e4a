pub mod alarm;
pub mod manager;
pub mod monitor;

pub use alarm::Alarm;
pub use manager::LocationEngine;
pub use monitor::LocationMonitor;
