pub mod order_file;
mod routy_app;
mod routy_operation;

pub use routy_app::RoutyApp;
pub use routy_operation::{parse_traffic_update, RoutyOperation, TrafficUpdate};
