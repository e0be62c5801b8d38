use super::departure_ops;
use crate::model::{traffic::TrafficLevel, RoutyError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// travel time forecast for a single departure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Prediction {
    pub start: String,
    pub end: String,
    pub departure_time: NaiveDateTime,
    /// traffic-free travel time in minutes
    pub base_time_minutes: f64,
    pub predicted_time_minutes: f64,
    pub delay_factor: f64,
    pub delay_minutes: f64,
    pub traffic_level: TrafficLevel,
    pub confidence: f64,
}

impl Prediction {
    /// fails when the arrival falls past the calendar range.
    pub fn arrival_time(&self) -> Result<NaiveDateTime, RoutyError> {
        departure_ops::minutes_after(&self.departure_time, self.predicted_time_minutes)
    }
}
