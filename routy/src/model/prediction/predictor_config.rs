use crate::model::RoutyError;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PredictorConfig {
    /// departures at most this many hours after "now" blend in live traffic
    pub near_term_horizon_hours: f64,
    /// share of the live delay in the near-term blend, the pattern takes the rest
    pub live_weight: f64,
    /// relative half-width of the uniform jitter applied to the resolved delay.
    /// zero disables jitter.
    pub jitter_ratio: f64,
    pub near_term_confidence: f64,
    pub long_term_confidence: f64,
    /// fixed seed for the jitter stream. when absent the stream is seeded from
    /// system entropy.
    pub seed: Option<u64>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            near_term_horizon_hours: 2.0,
            live_weight: 0.7,
            jitter_ratio: 0.2,
            near_term_confidence: 0.8,
            long_term_confidence: 0.6,
            seed: None,
        }
    }
}

impl PredictorConfig {
    pub fn validate(&self) -> Result<(), RoutyError> {
        let unit_fields = [
            ("live_weight", self.live_weight),
            ("jitter_ratio", self.jitter_ratio),
            ("near_term_confidence", self.near_term_confidence),
            ("long_term_confidence", self.long_term_confidence),
        ];
        if let Some((name, value)) = unit_fields
            .iter()
            .find(|(_, value)| !(0.0..=1.0).contains(value))
        {
            return Err(RoutyError::ConfigurationError(format!(
                "predictor {name} must be within [0, 1], found {value}"
            )));
        }
        if !(self.near_term_horizon_hours.is_finite() && self.near_term_horizon_hours >= 0.0) {
            return Err(RoutyError::ConfigurationError(format!(
                "predictor near_term_horizon_hours must be non-negative, found {}",
                self.near_term_horizon_hours
            )));
        }
        Ok(())
    }
}
