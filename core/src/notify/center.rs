use std::sync::Arc;

use log::debug;
use tokio::sync::RwLock;

use crate::notify::record::DeliveredNotification;
use crate::notify::request::NotificationRequest;
use crate::prelude::{EngineError, EngineResult, NotificationSink};

/// How the simulated permission prompt answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationPolicy {
    Grant,
    Deny,
}

struct CenterState {
    authorized: bool,
    pending: Vec<NotificationRequest>,
    delivered: Vec<DeliveredNotification>,
}

/// In-process stand-in for the OS notification store.
///
/// Enumeration and mutation are async; callers await instead of blocking
/// on a completion callback.
pub struct NotificationCenter {
    policy: AuthorizationPolicy,
    state: RwLock<CenterState>,
    sinks: RwLock<Vec<Arc<dyn NotificationSink>>>,
}

impl NotificationCenter {
    pub fn new(policy: AuthorizationPolicy) -> Self {
        Self {
            policy,
            state: RwLock::new(CenterState {
                authorized: false,
                pending: Vec::new(),
                delivered: Vec::new(),
            }),
            sinks: RwLock::new(Vec::new()),
        }
    }

    /// Answers the permission prompt per the configured policy. Denial
    /// leaves the center unauthorized and is otherwise silent.
    pub async fn request_authorization(&self) -> bool {
        let granted = self.policy == AuthorizationPolicy::Grant;
        if granted {
            self.state.write().await.authorized = true;
        }
        granted
    }

    pub async fn is_authorized(&self) -> bool {
        self.state.read().await.authorized
    }

    pub async fn register_sink(&self, sink: Arc<dyn NotificationSink>) {
        self.sinks.write().await.push(sink);
    }

    /// Appends to the pending store, replacing any pending request with
    /// the same identifier.
    pub async fn add_request(&self, request: NotificationRequest) -> EngineResult<()> {
        let mut state = self.state.write().await;
        if !state.authorized {
            return Err(EngineError::NotAuthorized(request.identifier));
        }
        state.pending.retain(|held| held.identifier != request.identifier);
        debug!("pending request added: {}", request.identifier);
        state.pending.push(request);
        Ok(())
    }

    pub async fn pending_identifiers(&self) -> Vec<String> {
        let state = self.state.read().await;
        state
            .pending
            .iter()
            .map(|request| request.identifier.clone())
            .collect()
    }

    pub async fn delivered_identifiers(&self) -> Vec<String> {
        let state = self.state.read().await;
        state
            .delivered
            .iter()
            .map(|record| record.identifier.clone())
            .collect()
    }

    /// Pending identifiers followed by delivered ones.
    pub async fn all_identifiers(&self) -> Vec<String> {
        let mut identifiers = self.pending_identifiers().await;
        identifiers.extend(self.delivered_identifiers().await);
        identifiers
    }

    /// Moves the pending request to the delivered store and fans the
    /// record out to registered sinks. One-shot requests leave the
    /// pending store permanently.
    pub async fn deliver(
        &self,
        identifier: &str,
        timestamp: f64,
    ) -> EngineResult<DeliveredNotification> {
        let record = {
            let mut state = self.state.write().await;
            let position = state
                .pending
                .iter()
                .position(|request| request.identifier == identifier)
                .ok_or_else(|| EngineError::UnknownRequest(identifier.to_string()))?;

            let request = if state.pending[position].trigger.repeats {
                state.pending[position].clone()
            } else {
                state.pending.remove(position)
            };

            let record = DeliveredNotification::new(
                request.identifier,
                request.content.title,
                request.content.body,
                timestamp,
            );
            state.delivered.push(record.clone());
            record
        };

        let sinks = self.sinks.read().await.clone();
        for sink in &sinks {
            sink.notification_delivered(&record);
        }
        Ok(record)
    }

    pub async fn remove_pending(&self, identifiers: &[String]) {
        let mut state = self.state.write().await;
        state
            .pending
            .retain(|request| !identifiers.contains(&request.identifier));
    }

    pub async fn remove_delivered(&self, identifiers: &[String]) {
        let mut state = self.state.write().await;
        state
            .delivered
            .retain(|record| !identifiers.contains(&record.identifier));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{CircularRegion, Coordinate};
    use crate::notify::request::{NotificationContent, RegionTrigger};
    use std::sync::Mutex;

    fn request(identifier: &str) -> NotificationRequest {
        let region = CircularRegion::entry_only(Coordinate::new(35.0, 139.0), 500.0, identifier);
        NotificationRequest::new(
            identifier,
            NotificationContent {
                title: "NotifyByLocation".into(),
                body: "near".into(),
                sound: "NotifySound".into(),
                category: "NotifyByLocation".into(),
            },
            RegionTrigger {
                region,
                repeats: false,
            },
        )
    }

    struct RecordingSink {
        seen: Mutex<Vec<String>>,
    }

    impl NotificationSink for RecordingSink {
        fn notification_delivered(&self, notification: &DeliveredNotification) {
            self.seen
                .lock()
                .unwrap()
                .push(notification.identifier.clone());
        }
    }

    #[tokio::test]
    async fn denial_blocks_requests_silently() {
        let center = NotificationCenter::new(AuthorizationPolicy::Deny);
        assert!(!center.request_authorization().await);
        assert!(center.add_request(request("a")).await.is_err());
        assert!(center.pending_identifiers().await.is_empty());
    }

    #[tokio::test]
    async fn delivery_moves_one_shot_requests_to_the_delivered_store() {
        let center = NotificationCenter::new(AuthorizationPolicy::Grant);
        center.request_authorization().await;
        center.add_request(request("dest")).await.unwrap();

        let record = center.deliver("dest", 12.0).await.unwrap();
        assert_eq!(record.title, "NotifyByLocation");
        assert!(center.pending_identifiers().await.is_empty());
        assert_eq!(center.delivered_identifiers().await, vec!["dest"]);
        assert!(center.deliver("dest", 13.0).await.is_err());
    }

    #[tokio::test]
    async fn adding_the_same_identifier_replaces_the_pending_request() {
        let center = NotificationCenter::new(AuthorizationPolicy::Grant);
        center.request_authorization().await;
        center.add_request(request("dest")).await.unwrap();
        center.add_request(request("dest")).await.unwrap();
        assert_eq!(center.pending_identifiers().await.len(), 1);
    }

    #[tokio::test]
    async fn sinks_observe_deliveries() {
        let center = NotificationCenter::new(AuthorizationPolicy::Grant);
        center.request_authorization().await;
        let sink = Arc::new(RecordingSink {
            seen: Mutex::new(Vec::new()),
        });
        center.register_sink(sink.clone()).await;

        center.add_request(request("dest")).await.unwrap();
        center.deliver("dest", 1.0).await.unwrap();
        assert_eq!(*sink.seen.lock().unwrap(), vec!["dest".to_string()]);
    }

    #[tokio::test]
    async fn removal_is_exact_identifier_only() {
        let center = NotificationCenter::new(AuthorizationPolicy::Grant);
        center.request_authorization().await;
        center.add_request(request("dest")).await.unwrap();
        center.add_request(request("dest-2")).await.unwrap();

        center.remove_pending(&["dest".to_string()]).await;
        assert_eq!(center.pending_identifiers().await, vec!["dest-2"]);
    }
}
