//! traffic-aware travel time prediction and delivery route planning over a
//! [`routy_network::RoadNetwork`].
pub mod app;
pub mod config;
pub mod model;
