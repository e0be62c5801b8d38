use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// bucketed view of a delay factor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficLevel {
    #[serde(rename = "very low")]
    VeryLow,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

impl TrafficLevel {
    /// [0, 0.2) very low, [0.2, 0.4) low, [0.4, 0.6) medium, [0.6, 0.8) high,
    /// [0.8, 1] very high
    pub fn from_delay(delay_factor: f64) -> TrafficLevel {
        if delay_factor < 0.2 {
            TrafficLevel::VeryLow
        } else if delay_factor < 0.4 {
            TrafficLevel::Low
        } else if delay_factor < 0.6 {
            TrafficLevel::Medium
        } else if delay_factor < 0.8 {
            TrafficLevel::High
        } else {
            TrafficLevel::VeryHigh
        }
    }
}

impl Display for TrafficLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrafficLevel::VeryLow => write!(f, "very low"),
            TrafficLevel::Low => write!(f, "low"),
            TrafficLevel::Medium => write!(f, "medium"),
            TrafficLevel::High => write!(f, "high"),
            TrafficLevel::VeryHigh => write!(f, "very high"),
        }
    }
}
