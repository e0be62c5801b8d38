//! road graph for the routy delivery planner: named locations joined by
//! undirected edges whose travel times are inflated by traffic delay.
mod edge;
mod location_id;
mod location_policy;
mod network_error;
mod road_network;
pub mod search;
mod shared_network;

pub use edge::{Edge, EdgeSummary, WeightKind};
pub use location_id::LocationId;
pub use location_policy::UnknownLocationPolicy;
pub use network_error::NetworkError;
pub use road_network::{RoadNetwork, ShortestPath};
pub use shared_network::SharedRoadNetwork;
