use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::generator::TrackConfig;
use crate::viewmodel::AlarmSettings;

/// One offline scenario: the query to type, the suggestion to tap, the
/// alarm parameters, and the approach track to replay.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub query: String,
    pub select_index: usize,
    pub radius_m: f64,
    pub sound: String,
    pub message: String,
    pub track: TrackConfig,
    pub description: Option<String>,
    pub scenario: Option<String>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            query: "Tokyo Tower".to_string(),
            select_index: 0,
            radius_m: 500.0,
            sound: "NotifySound".to_string(),
            message: "目的地付近です".to_string(),
            track: TrackConfig::default(),
            description: None,
            scenario: None,
        }
    }
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario config {}", path_ref.display()))?;
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_query(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Self::default()
        }
    }

    /// Alarm parameters under the application's fixed identifier.
    pub fn alarm_settings(&self) -> AlarmSettings {
        AlarmSettings {
            radius_m: self.radius_m,
            sound: self.sound.clone(),
            message: self.message.clone(),
            ..AlarmSettings::default()
        }
    }
}
