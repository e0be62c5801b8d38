use crate::model::RoutyError;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
    pub episodes: usize,
    pub learning_rate: f64,
    /// discount applied to future rewards of a rollout
    pub discount: f64,
    /// probability of picking a random order instead of the greedy one
    pub epsilon: f64,
    pub orders_per_episode: usize,
    pub max_priority: i64,
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            learning_rate: 0.01,
            discount: 0.9,
            epsilon: 0.1,
            orders_per_episode: 4,
            max_priority: 3,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), RoutyError> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(RoutyError::ConfigurationError(format!(
                "training learning_rate must be positive, found {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(RoutyError::ConfigurationError(format!(
                "training discount must be within [0, 1], found {}",
                self.discount
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(RoutyError::ConfigurationError(format!(
                "training epsilon must be within [0, 1], found {}",
                self.epsilon
            )));
        }
        if self.orders_per_episode == 0 {
            return Err(RoutyError::ConfigurationError(String::from(
                "training orders_per_episode must be at least 1",
            )));
        }
        if self.max_priority < 1 {
            return Err(RoutyError::ConfigurationError(format!(
                "training max_priority must be at least 1, found {}",
                self.max_priority
            )));
        }
        Ok(())
    }
}
