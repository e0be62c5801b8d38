use super::Order;
use crate::model::RoutyError;
use routy_network::{NetworkError, RoadNetwork};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// travel time, in minutes, assumed for a leg the network cannot route
pub const UNREACHABLE_MINUTES: f64 = 24.0 * 60.0;

/// position of a partially built route: the network it runs on and the
/// location the vehicle currently stands at, if any stop was visited yet.
#[derive(Clone, Copy)]
pub struct PolicyState<'a> {
    pub network: &'a RoadNetwork,
    pub current: Option<&'a str>,
}

/// scores the value of serving `candidate` next from `state`. higher is better.
/// implementations must be pure functions of their parameters and inputs.
pub trait ValueModel: Send + Sync {
    fn score(&self, state: &PolicyState<'_>, candidate: &Order) -> f64;
}

/// features describing one candidate order, time features in hours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderFeatures {
    pub bias: f64,
    pub priority: f64,
    pub approach_hours: f64,
    pub service_hours: f64,
    pub contiguous: f64,
}

impl OrderFeatures {
    pub fn of(state: &PolicyState<'_>, candidate: &Order) -> OrderFeatures {
        let (approach_minutes, contiguous) = match state.current {
            None => (0.0, 0.0),
            Some(current) if current == candidate.start_location => (0.0, 1.0),
            Some(current) => (
                leg_minutes(state.network, current, &candidate.start_location),
                0.0,
            ),
        };
        let service_minutes = leg_minutes(
            state.network,
            &candidate.start_location,
            &candidate.end_location,
        );
        OrderFeatures {
            bias: 1.0,
            priority: candidate.priority as f64,
            approach_hours: approach_minutes / 60.0,
            service_hours: service_minutes / 60.0,
            contiguous,
        }
    }

    pub fn as_array(&self) -> [f64; 5] {
        [
            self.bias,
            self.priority,
            self.approach_hours,
            self.service_hours,
            self.contiguous,
        ]
    }
}

/// shortest travel time over current weights, or [`UNREACHABLE_MINUTES`] when
/// no path connects the two. callers check the endpoints beforehand.
pub fn leg_minutes(network: &RoadNetwork, a: &str, b: &str) -> f64 {
    network.shortest_path_length(a, b).unwrap_or_else(|e| {
        if !matches!(e, NetworkError::NoPathFound(_, _)) {
            log::warn!("leg {a} -> {b} scored as unreachable: {e}");
        }
        UNREACHABLE_MINUTES
    })
}

/// coefficients of a [`LinearValueModel`], one per [`OrderFeatures`] field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FeatureWeights {
    pub bias: f64,
    pub priority: f64,
    pub approach_hours: f64,
    pub service_hours: f64,
    pub contiguous: f64,
}

impl Default for FeatureWeights {
    /// untrained starting point: urgent orders first, then nearby ones
    fn default() -> Self {
        Self {
            bias: 0.0,
            priority: -1.0,
            approach_hours: -0.1,
            service_hours: 0.0,
            contiguous: 0.05,
        }
    }
}

impl FeatureWeights {
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.bias,
            self.priority,
            self.approach_hours,
            self.service_hours,
            self.contiguous,
        ]
    }

    pub fn from_array(values: [f64; 5]) -> FeatureWeights {
        let [bias, priority, approach_hours, service_hours, contiguous] = values;
        FeatureWeights {
            bias,
            priority,
            approach_hours,
            service_hours,
            contiguous,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|w| w.is_finite())
    }
}

/// linear value function over [`OrderFeatures`], persisted as a JSON artifact.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LinearValueModel {
    pub weights: FeatureWeights,
    /// number of training episodes behind these weights
    #[serde(default)]
    pub episodes_trained: usize,
}

impl LinearValueModel {
    pub fn new(weights: FeatureWeights) -> LinearValueModel {
        LinearValueModel {
            weights,
            episodes_trained: 0,
        }
    }

    pub fn value(&self, features: &OrderFeatures) -> f64 {
        self.weights
            .as_array()
            .iter()
            .zip(features.as_array().iter())
            .map(|(w, x)| w * x)
            .sum()
    }

    /// reads a model artifact. a file with non-finite weights is corrupt.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<LinearValueModel, RoutyError> {
        let path = path.as_ref();
        let artifact_error =
            |msg: String| RoutyError::ModelArtifactError(path.to_string_lossy().to_string(), msg);
        let contents = std::fs::read_to_string(path)
            .map_err(|e| artifact_error(format!("unable to read file: {e}")))?;
        let model: LinearValueModel = serde_json::from_str(&contents)
            .map_err(|e| artifact_error(format!("unable to parse model: {e}")))?;
        if !model.weights.is_finite() {
            return Err(artifact_error(String::from(
                "model contains non-finite weights",
            )));
        }
        Ok(model)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RoutyError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|e| {
            RoutyError::ModelArtifactError(
                path.to_string_lossy().to_string(),
                format!("unable to write file: {e}"),
            )
        })
    }
}

impl ValueModel for LinearValueModel {
    fn score(&self, state: &PolicyState<'_>, candidate: &Order) -> f64 {
        self.value(&OrderFeatures::of(state, candidate))
    }
}
