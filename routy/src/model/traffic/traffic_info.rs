use super::{live_delay_or_zero, TrafficSignal};
use serde::{Deserialize, Serialize};

/// maximum delay in minutes attached to a fully congested live reading
const MAX_LIVE_DELAY_MINUTES: f64 = 30.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrafficStatus {
    Free,
    Light,
    Moderate,
    Heavy,
}

impl TrafficStatus {
    pub fn from_delay(delay_factor: f64) -> TrafficStatus {
        if delay_factor < 0.2 {
            TrafficStatus::Free
        } else if delay_factor < 0.5 {
            TrafficStatus::Light
        } else if delay_factor < 0.8 {
            TrafficStatus::Moderate
        } else {
            TrafficStatus::Heavy
        }
    }
}

/// live traffic summary for an origin/destination pair
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrafficInfo {
    pub start: String,
    pub end: String,
    pub delay_factor: f64,
    pub estimated_delay_minutes: u32,
    pub traffic_status: TrafficStatus,
}

pub fn route_traffic_info(signal: &dyn TrafficSignal, start: &str, end: &str) -> TrafficInfo {
    let delay_factor = live_delay_or_zero(signal);
    TrafficInfo {
        start: start.to_string(),
        end: end.to_string(),
        delay_factor,
        estimated_delay_minutes: (delay_factor * MAX_LIVE_DELAY_MINUTES) as u32,
        traffic_status: TrafficStatus::from_delay(delay_factor),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::traffic::FixedTrafficSignal;

    #[test]
    fn test_route_traffic_info() {
        let info = route_traffic_info(&FixedTrafficSignal(0.55), "Berlin", "Hamburg");
        assert_eq!(info.estimated_delay_minutes, 16);
        assert_eq!(info.traffic_status, TrafficStatus::Moderate);
        let info = route_traffic_info(&FixedTrafficSignal(0.0), "Berlin", "Hamburg");
        assert_eq!(info.traffic_status, TrafficStatus::Free);
        assert_eq!(info.estimated_delay_minutes, 0);
    }
}
