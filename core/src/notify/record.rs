use serde::{Deserialize, Serialize};

/// Record kept in the delivered store once a region trigger has fired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveredNotification {
    pub identifier: String,
    pub title: String,
    pub body: String,
    pub delivered_at: f64,
}

impl DeliveredNotification {
    pub fn new(
        identifier: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        delivered_at: f64,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            body: body.into(),
            delivered_at,
        }
    }
}
