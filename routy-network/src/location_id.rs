use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// dense index of a location within a [`crate::RoadNetwork`], assigned in
/// registration order.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Deserialize, Serialize, Hash,
)]
pub struct LocationId(pub usize);

impl Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
