use crate::LocationId;
use serde::{Deserialize, Serialize};

/// undirected road segment between two registered locations. weights are
/// travel times in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub src: LocationId,
    pub dst: LocationId,
    base_weight: f64,
    current_weight: f64,
}

impl Edge {
    pub(crate) fn new(src: LocationId, dst: LocationId, base_weight: f64) -> Edge {
        Edge {
            src,
            dst,
            base_weight,
            current_weight: base_weight,
        }
    }

    pub fn base_weight(&self) -> f64 {
        self.base_weight
    }

    pub fn current_weight(&self) -> f64 {
        self.current_weight
    }

    /// fractional increase of the current weight over the base weight, in [0, 1].
    pub fn delay_factor(&self) -> f64 {
        (self.current_weight / self.base_weight - 1.0).clamp(0.0, 1.0)
    }

    pub fn weight(&self, kind: WeightKind) -> f64 {
        match kind {
            WeightKind::Current => self.current_weight,
            WeightKind::Base => self.base_weight,
        }
    }

    /// the location on the other side of this edge from `from`.
    pub fn opposite(&self, from: LocationId) -> LocationId {
        if self.src == from {
            self.dst
        } else {
            self.src
        }
    }

    /// sets the current weight from a delay factor. the factor is clamped to [0, 1]
    /// and the full edge state is replaced in one assignment.
    pub(crate) fn apply_delay(&mut self, delay_factor: f64) {
        let delay = if delay_factor.is_nan() {
            0.0
        } else {
            delay_factor.clamp(0.0, 1.0)
        };
        self.current_weight = self.base_weight * (1.0 + delay);
    }
}

/// selects which edge cost a search runs over.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightKind {
    /// the traffic-perturbed weight written by `update_traffic`
    #[default]
    Current,
    /// the nominal traffic-free weight
    Base,
}

/// flattened view of an edge with its endpoint names, as reported by
/// [`crate::RoadNetwork::get_all_edges`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSummary {
    pub start: String,
    pub end: String,
    pub weight: f64,
    pub base_weight: f64,
    pub delay_factor: f64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_apply_delay_clamps() {
        let mut edge = Edge::new(LocationId(0), LocationId(1), 100.0);
        edge.apply_delay(1.7);
        assert_eq!(edge.current_weight(), 200.0);
        assert_eq!(edge.delay_factor(), 1.0);
        edge.apply_delay(-0.3);
        assert_eq!(edge.current_weight(), 100.0);
        assert_eq!(edge.delay_factor(), 0.0);
        edge.apply_delay(f64::NAN);
        assert_eq!(edge.current_weight(), 100.0);
    }

    #[test]
    fn test_opposite() {
        let edge = Edge::new(LocationId(3), LocationId(7), 1.0);
        assert_eq!(edge.opposite(LocationId(3)), LocationId(7));
        assert_eq!(edge.opposite(LocationId(7)), LocationId(3));
    }
}
