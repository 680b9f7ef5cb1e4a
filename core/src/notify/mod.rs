pub mod center;
pub mod record;
pub mod request;

pub use center::{AuthorizationPolicy, NotificationCenter};
pub use record::DeliveredNotification;
pub use request::{NotificationContent, NotificationRequest, RegionTrigger};
