use super::TrafficSignal;
use crate::model::RoutyError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const AUTOBAHN_API_URL: &str = "https://verkehr.autobahn.de/o/autobahn/";

/// number of reported incidents that saturates the live delay factor at 1.0
const EVENTS_AT_FULL_DELAY: f64 = 50.0;

/// response keys holding lists of incidents
const EVENT_KEYS: [&str; 4] = ["roadworks", "warning", "closure", "events"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AutobahnSignalConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    String::from(AUTOBAHN_API_URL)
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for AutobahnSignalConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// live delay derived from the number of incidents listed by the Autobahn
/// traffic API. every request is bounded by the configured timeout.
pub struct AutobahnTrafficSignal {
    client: reqwest::blocking::Client,
    url: String,
}

impl AutobahnTrafficSignal {
    pub fn new(config: &AutobahnSignalConfig) -> Result<AutobahnTrafficSignal, RoutyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                RoutyError::ConfigurationError(format!("failed to build traffic API client: {e}"))
            })?;
        Ok(AutobahnTrafficSignal {
            client,
            url: config.url.clone(),
        })
    }

    fn fetch(&self) -> Result<serde_json::Value, reqwest::Error> {
        self.client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .json::<serde_json::Value>()
    }
}

impl TrafficSignal for AutobahnTrafficSignal {
    fn get_live_delay(&self) -> f64 {
        match self.fetch() {
            Ok(body) => {
                let delay = delay_from_events(&body);
                log::debug!("traffic API at {} reports delay factor {delay:.2}", self.url);
                delay
            }
            Err(e) => {
                log::warn!("traffic API at {} unavailable, using delay 0.0: {e}", self.url);
                0.0
            }
        }
    }
}

/// converts an API response into a delay factor: `min(1, n / 50)` where n is
/// the total length of the incident lists found in the response.
pub fn delay_from_events(body: &serde_json::Value) -> f64 {
    let n_events: usize = EVENT_KEYS
        .iter()
        .filter_map(|key| body.get(key).and_then(|v| v.as_array()))
        .map(|events| events.len())
        .sum();
    (n_events as f64 / EVENTS_AT_FULL_DELAY).min(1.0)
}
