use serde::{Deserialize, Serialize};

/// a planned stop sequence. derived from an order batch, never stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Route {
    pub stops: Vec<String>,
    /// summed shortest-path travel time between consecutive stops, in minutes
    pub estimated_duration_minutes: f64,
    pub total_orders: usize,
}

impl Route {
    pub fn empty() -> Route {
        Route {
            stops: vec![],
            estimated_duration_minutes: 0.0,
            total_orders: 0,
        }
    }
}
