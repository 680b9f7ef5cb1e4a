use std::sync::{Arc, Mutex, MutexGuard};

use crate::engine::alarm::Alarm;
use crate::engine::monitor::LocationMonitor;
use crate::geo::CircularRegion;
use crate::notify::{AuthorizationPolicy, DeliveredNotification, NotificationCenter};
use crate::prelude::{
    EngineError, EngineResult, LocationFix, MonitorConfig, NotificationSink, RegionTransition,
    Status,
};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::MetricsRecorder;

/// Geofence notification manager: owns the notification center and the
/// location monitor, and keeps their registrations paired per alarm.
///
/// Constructed once at startup and injected wherever it is needed; there
/// is no shared global instance.
pub struct LocationEngine {
    app_name: String,
    center: Arc<NotificationCenter>,
    monitor: Mutex<LocationMonitor>,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl LocationEngine {
    pub fn new(app_name: impl Into<String>, policy: AuthorizationPolicy) -> Self {
        Self::with_config(app_name, policy, MonitorConfig::default())
    }

    pub fn with_config(
        app_name: impl Into<String>,
        policy: AuthorizationPolicy,
        config: MonitorConfig,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            center: Arc::new(NotificationCenter::new(policy)),
            monitor: Mutex::new(LocationMonitor::new(config)),
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    fn monitor(&self) -> EngineResult<MutexGuard<'_, LocationMonitor>> {
        self.monitor
            .lock()
            .map_err(|_| EngineError::Internal("location monitor lock poisoned".into()))
    }

    /// Requests notification permission and, on grant, when-in-use
    /// location permission. Denial is silent.
    pub async fn request_authorization(&self) -> bool {
        let granted = self.center.request_authorization().await;
        if granted {
            if let Ok(mut monitor) = self.monitor.lock() {
                monitor.request_when_in_use();
            }
        }
        granted
    }

    pub async fn register_sink(&self, sink: Arc<dyn NotificationSink>) {
        self.center.register_sink(sink).await;
    }

    /// Registers a one-shot, entry-triggered notification around the
    /// coordinate and starts location monitoring for it.
    pub async fn schedule_region_notification(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
        identifier: &str,
        sound: &str,
        message: &str,
    ) -> EngineResult<()> {
        let alarm = Alarm::entry_only(latitude, longitude, radius_m, identifier, sound, message);
        self.arm(alarm).await
    }

    /// Arms the alarm: notification request and region monitor together.
    pub async fn arm(&self, alarm: Alarm) -> EngineResult<()> {
        let request = alarm.to_request(&self.app_name);
        if let Err(err) = self.center.add_request(request).await {
            self.metrics.record_rejected();
            self.logger
                .record(&format!("alarm {} rejected: {}", alarm.identifier, err));
            return Err(err);
        }

        let mut monitor = self.monitor()?;
        monitor.start_monitoring(alarm.region.clone());
        monitor.start_updating(None);
        drop(monitor);

        self.metrics.record_armed();
        self.logger
            .record_alarm_armed(&alarm.identifier, alarm.region.radius_m);
        Ok(())
    }

    /// Disarms the alarm: removes its notifications and its region
    /// monitor in one call.
    pub async fn disarm(&self, identifier: &str) -> EngineResult<()> {
        self.remove(identifier).await
    }

    /// Removes every pending and delivered notification whose identifier
    /// starts with `prefix`, then stops monitoring that region.
    pub async fn remove(&self, prefix: &str) -> EngineResult<()> {
        let matched: Vec<String> = self
            .center
            .all_identifiers()
            .await
            .into_iter()
            .filter(|identifier| identifier.starts_with(prefix))
            .collect();

        if !matched.is_empty() {
            self.center.remove_pending(&matched).await;
            self.center.remove_delivered(&matched).await;
            self.metrics.record_removed(matched.len());
        }

        self.stop_region_monitoring(prefix)
    }

    /// Pass-through to the monitor; idempotent while already updating.
    pub fn start_updating_location(&self, region: Option<CircularRegion>) -> EngineResult<()> {
        self.monitor()?.start_updating(region);
        Ok(())
    }

    /// Stops continuous updates only. Region monitors registered for the
    /// current alarm stay in place; `remove`/`disarm` is the complete path.
    pub fn stop_updating_location(&self) -> EngineResult<()> {
        self.monitor()?.stop_updating();
        Ok(())
    }

    /// Stops monitoring the named region; the monitor stops updates as
    /// well once no regions remain.
    pub fn stop_region_monitoring(&self, identifier: &str) -> EngineResult<()> {
        self.monitor()?.stop_monitoring(identifier);
        Ok(())
    }

    pub fn status(&self) -> Status {
        self.monitor
            .lock()
            .map(|monitor| monitor.status())
            .unwrap_or(Status::Idle)
    }

    pub fn monitored_region_identifiers(&self) -> Vec<String> {
        self.monitor
            .lock()
            .map(|monitor| monitor.monitored_identifiers())
            .unwrap_or_default()
    }

    pub async fn pending_identifiers(&self) -> Vec<String> {
        self.center.pending_identifiers().await
    }

    pub async fn delivered_identifiers(&self) -> Vec<String> {
        self.center.delivered_identifiers().await
    }

    pub async fn all_identifiers(&self) -> Vec<String> {
        self.center.all_identifiers().await
    }

    /// Feeds a fix through the monitor and delivers a notification for
    /// each entry event that still has a pending request.
    pub async fn handle_fix(&self, fix: LocationFix) -> EngineResult<Vec<DeliveredNotification>> {
        let events = self.monitor()?.push_fix(fix);

        let mut delivered = Vec::new();
        for event in events {
            if event.transition != RegionTransition::Entered {
                continue;
            }
            match self.center.deliver(&event.identifier, fix.timestamp).await {
                Ok(record) => {
                    self.metrics.record_delivered();
                    self.logger
                        .record_delivery(&record.identifier, record.delivered_at);
                    delivered.push(record);
                }
                // Region still monitored but its one-shot already fired.
                Err(EngineError::UnknownRequest(_)) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(delivered)
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }
}
