mod autobahn_signal;
mod traffic_info;
mod traffic_level;
mod traffic_pattern;
mod traffic_signal;

pub use autobahn_signal::{
    delay_from_events, AutobahnSignalConfig, AutobahnTrafficSignal, AUTOBAHN_API_URL,
};
pub use traffic_info::{route_traffic_info, TrafficInfo, TrafficStatus};
pub use traffic_level::TrafficLevel;
pub use traffic_pattern::{DayType, PatternAnchor, TrafficPattern, TrafficPatternConfig};
pub use traffic_signal::{live_delay_or_zero, FixedTrafficSignal, NoLiveTraffic, TrafficSignal};
