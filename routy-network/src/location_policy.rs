use serde::{Deserialize, Serialize};

/// behavior when a query names a location the network has never seen.
///
/// registration never invents edges: a newly registered location is isolated
/// until edges are added for it explicitly, so a route to it from anywhere
/// else reports no path.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownLocationPolicy {
    /// fail with `UnknownLocation`
    #[default]
    Reject,
    /// register the location before running the query
    Register,
}
