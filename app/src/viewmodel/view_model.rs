use std::sync::{Arc, Mutex, RwLock};

use log::{debug, warn};
use tokio::sync::mpsc::UnboundedReceiver;

use notifycore::engine::LocationEngine;
use notifycore::geo::span_for_km;
use notifycore::notify::DeliveredNotification;
use notifycore::prelude::{LocationFix, NotificationSink, Status};

use crate::search::{Completion, Gazetteer, PlaceSearch, SearchCompleter};
use crate::viewmodel::model::{MapViewport, PinItem, ViewState};

/// Alarm parameters applied when the user toggles the alarm on.
#[derive(Debug, Clone)]
pub struct AlarmSettings {
    pub identifier: String,
    pub radius_m: f64,
    pub sound: String,
    pub message: String,
}

impl Default for AlarmSettings {
    fn default() -> Self {
        Self {
            identifier: "NotifyByLocation".to_string(),
            radius_m: 500.0,
            sound: "NotifySound".to_string(),
            message: "目的地付近です".to_string(),
        }
    }
}

/// Search/pin view-model. All published state lives behind one `RwLock`
/// and every mutation goes through it, the equivalent of marshaling
/// every state change onto a single UI thread.
pub struct ContentViewModel {
    engine: Arc<LocationEngine>,
    completer: Mutex<SearchCompleter>,
    place_search: PlaceSearch,
    settings: AlarmSettings,
    state: Arc<RwLock<ViewState>>,
}

impl ContentViewModel {
    pub fn new(
        engine: Arc<LocationEngine>,
        gazetteer: Arc<Gazetteer>,
    ) -> (Arc<Self>, UnboundedReceiver<Vec<Completion>>) {
        Self::with_settings(engine, gazetteer, AlarmSettings::default())
    }

    pub fn with_settings(
        engine: Arc<LocationEngine>,
        gazetteer: Arc<Gazetteer>,
        settings: AlarmSettings,
    ) -> (Arc<Self>, UnboundedReceiver<Vec<Completion>>) {
        let (completer, results_rx) = SearchCompleter::new(gazetteer.clone());
        let completer = completer.point_of_interest_only();
        let view_model = Arc::new(Self {
            engine,
            completer: Mutex::new(completer),
            place_search: PlaceSearch::new(gazetteer),
            settings,
            state: Arc::new(RwLock::new(ViewState::default())),
        });
        (view_model, results_rx)
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.read().unwrap().clone()
    }

    /// First-appearance hook: asks for notification and location
    /// permission. Denial is silent.
    pub async fn on_appear(&self) {
        self.engine.request_authorization().await;
    }

    /// Input-change hook. Debounced by equality against the committed
    /// destination; empty input clears the suggestions; anything else is
    /// forwarded to the completer only when the fragment changed.
    pub fn on_search_location(&self, input: &str) {
        let query = {
            let mut state = self.state.write().unwrap();
            state.location = input.to_string();

            if state.search_query == state.location {
                state.completions.clear();
                return;
            }
            state.search_query = state.location.clone();

            if state.search_query.is_empty() {
                state.completions.clear();
                return;
            }
            state.search_query.clone()
        };

        let mut completer = self.completer.lock().unwrap();
        if completer.query_fragment() != query {
            completer.set_query_fragment(&query);
        }
    }

    /// Completer callback. A batch that arrives after the query was
    /// cleared is dropped; that emptiness check is the only guard against
    /// stale in-flight results.
    pub fn apply_completions(&self, results: Vec<Completion>) {
        let mut state = self.state.write().unwrap();
        if state.search_query.is_empty() {
            state.completions = Vec::new();
        } else {
            state.completions = results;
        }
    }

    /// Commits the tapped suggestion as the current destination and
    /// places the pin. Returns false for an out-of-range index.
    pub fn on_location_tap(&self, index: usize) -> bool {
        let title = {
            let state = self.state.read().unwrap();
            match state.completions.get(index) {
                Some(completion) => completion.title.clone(),
                None => return false,
            }
        };

        {
            let mut state = self.state.write().unwrap();
            state.location = title.clone();
            state.search_query = title;
        }

        self.set_pin();
        true
    }

    /// Geocodes the committed destination: first placemark wins, viewport
    /// narrows to a ~1 km span, and the pin list is replaced by exactly
    /// one marker. Zero results leave viewport and pins untouched.
    pub fn set_pin(&self) {
        let query = {
            let mut state = self.state.write().unwrap();
            state.completions.clear();
            state.location.clone()
        };

        let placemarks = self.place_search.natural_language_query(&query);
        if let Some(placemark) = placemarks.first() {
            debug!("geocoded {} in {}", placemark.name, placemark.locality);
            let coordinate = placemark.coordinate.unwrap_or_default();
            let span = span_for_km(1.0);

            let mut state = self.state.write().unwrap();
            state.latitude = coordinate.latitude;
            state.longitude = coordinate.longitude;
            state.viewport = MapViewport::new(coordinate, span);
            state.pins = vec![PinItem { coordinate }];
        }
    }

    /// Alarm toggle. Idle: clear any previous alarm under the fixed
    /// identifier, then arm a fresh geofence at the committed
    /// destination. Armed: stop location updates only; the region
    /// registration stays behind until the alarm is removed.
    pub async fn set_alarm(&self) {
        let (status, latitude, longitude) = {
            let state = self.state.read().unwrap();
            (state.status, state.latitude, state.longitude)
        };

        if status == Status::Idle {
            if let Err(err) = self.engine.remove(&self.settings.identifier).await {
                warn!("clearing previous alarm failed: {}", err);
            }

            let armed = self
                .engine
                .schedule_region_notification(
                    latitude,
                    longitude,
                    self.settings.radius_m,
                    &self.settings.identifier,
                    &self.settings.sound,
                    &self.settings.message,
                )
                .await;
            match armed {
                Ok(()) => {
                    self.state.write().unwrap().status = Status::Armed;
                }
                Err(err) => {
                    // Silent for the user: the alarm simply never arms.
                    warn!("alarm not armed: {}", err);
                }
            }
        } else {
            if let Err(err) = self.engine.stop_updating_location() {
                warn!("stopping location updates failed: {}", err);
            }
            self.state.write().unwrap().status = Status::Idle;
        }
    }

    /// Feeds a device fix to the engine; deliveries land in view state
    /// through the notification sink.
    pub async fn ingest_fix(&self, fix: LocationFix) -> usize {
        match self.engine.handle_fix(fix).await {
            Ok(delivered) => delivered.len(),
            Err(err) => {
                warn!("fix rejected: {}", err);
                0
            }
        }
    }
}

impl NotificationSink for ContentViewModel {
    fn notification_delivered(&self, notification: &DeliveredNotification) {
        let mut state = self.state.write().unwrap();
        state.delivered.push(notification.clone());
    }
}
