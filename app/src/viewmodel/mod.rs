pub mod bridge;
pub mod model;
pub mod view_model;

pub use bridge::ViewBridge;
pub use model::{MapViewport, PinItem, ViewState};
pub use view_model::{AlarmSettings, ContentViewModel};
