use super::{LinearValueModel, ValueModel};
use std::{fmt, sync::Arc};

/// strategy used by the route optimizer to sequence orders.
#[derive(Clone, Default)]
pub enum RoutingPolicy {
    /// priority order, submission order among equal priorities
    #[default]
    Deterministic,
    /// greedy selection by a value model's score
    Learned(Arc<dyn ValueModel>),
}

impl RoutingPolicy {
    /// learned policy from a model artifact. a missing or unreadable artifact
    /// yields the deterministic policy.
    pub fn from_artifact(path: Option<&str>) -> RoutingPolicy {
        let Some(path) = path else {
            log::debug!("no policy artifact configured, using deterministic routing");
            return RoutingPolicy::Deterministic;
        };
        match LinearValueModel::load(path) {
            Ok(model) => {
                log::info!(
                    "loaded learned routing policy from {} ({} training episodes)",
                    path,
                    model.episodes_trained
                );
                RoutingPolicy::Learned(Arc::new(model))
            }
            Err(e) => {
                log::warn!("{e}, falling back to deterministic routing");
                RoutingPolicy::Deterministic
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoutingPolicy::Deterministic => "deterministic",
            RoutingPolicy::Learned(_) => "learned",
        }
    }
}

impl fmt::Debug for RoutingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoutingPolicy::{}", self.name())
    }
}
