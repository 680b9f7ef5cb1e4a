use std::sync::Arc;

use anyhow::bail;
use log::info;

use notifycore::engine::LocationEngine;
use notifycore::geo::Coordinate;
use notifycore::prelude::Status;

use crate::generator::build_track;
use crate::search::Gazetteer;
use crate::viewmodel::ContentViewModel;
use crate::workflow::config::ScenarioConfig;

pub struct ScenarioResult {
    pub destination: String,
    pub pin: Coordinate,
    pub span_deg: f64,
    pub status: Status,
    pub suggestion_count: usize,
    pub fix_count: usize,
    pub delivered: Vec<String>,
}

/// Drives the full search → pin → arm → approach flow against a fresh
/// view-model wired to the injected engine.
#[derive(Clone)]
pub struct Runner {
    config: ScenarioConfig,
}

impl Runner {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    pub async fn execute(
        &self,
        engine: Arc<LocationEngine>,
        gazetteer: Arc<Gazetteer>,
    ) -> anyhow::Result<ScenarioResult> {
        let (view_model, mut results_rx) = ContentViewModel::with_settings(
            engine.clone(),
            gazetteer,
            self.config.alarm_settings(),
        );
        engine.register_sink(view_model.clone()).await;

        view_model.on_appear().await;
        view_model.on_search_location(&self.config.query);
        while let Ok(batch) = results_rx.try_recv() {
            view_model.apply_completions(batch);
        }

        let completions = view_model.snapshot().completions;
        let suggestion_count = completions.len();
        if let Some(first) = completions.first() {
            info!("top suggestion: {}", first.label());
        }
        if !view_model.on_location_tap(self.config.select_index) {
            bail!(
                "no suggestion at index {} for query {:?}",
                self.config.select_index,
                self.config.query
            );
        }

        view_model.set_alarm().await;

        let state = view_model.snapshot();
        let pin = match state.pins.first() {
            Some(pin) => pin.coordinate,
            None => bail!("no pin placed for query {:?}", self.config.query),
        };

        let track = build_track(pin, &self.config.track);
        let fix_count = track.len();
        for fix in track {
            view_model.ingest_fix(fix).await;
        }

        let delivered = engine.delivered_identifiers().await;
        let state = view_model.snapshot();

        Ok(ScenarioResult {
            destination: state.location.clone(),
            pin,
            span_deg: state.viewport.latitude_span_deg,
            status: state.status,
            suggestion_count,
            fix_count,
            delivered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notifycore::notify::AuthorizationPolicy;

    fn engine(policy: AuthorizationPolicy) -> Arc<LocationEngine> {
        Arc::new(LocationEngine::new("NotifyByLocation", policy))
    }

    #[tokio::test]
    async fn tokyo_tower_scenario_delivers_the_arrival_notification() {
        let runner = Runner::new(ScenarioConfig::default());
        let result = runner
            .execute(engine(AuthorizationPolicy::Grant), Arc::new(Gazetteer::builtin()))
            .await
            .unwrap();

        assert_eq!(result.destination, "Tokyo Tower");
        assert_eq!(result.pin, Coordinate::new(35.6586, 139.7454));
        assert!((result.span_deg - 1.0 / 111.0).abs() < 1e-9);
        assert_eq!(result.status, Status::Armed);
        assert!(result.suggestion_count >= 1);
        assert_eq!(result.delivered, vec!["NotifyByLocation"]);
    }

    #[tokio::test]
    async fn unknown_destinations_fail_the_scenario() {
        let runner = Runner::new(ScenarioConfig::from_query("Atlantis"));
        let result = runner
            .execute(engine(AuthorizationPolicy::Grant), Arc::new(Gazetteer::builtin()))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn denied_permissions_deliver_nothing() {
        let runner = Runner::new(ScenarioConfig::default());
        let result = runner
            .execute(engine(AuthorizationPolicy::Deny), Arc::new(Gazetteer::builtin()))
            .await
            .unwrap();

        assert_eq!(result.status, Status::Idle);
        assert!(result.delivered.is_empty());
    }
}
