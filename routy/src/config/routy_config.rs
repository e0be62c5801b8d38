use crate::model::{
    optimizer::TrainingConfig,
    prediction::PredictorConfig,
    traffic::{
        AutobahnSignalConfig, AutobahnTrafficSignal, FixedTrafficSignal, NoLiveTraffic,
        TrafficPatternConfig, TrafficSignal,
    },
    RoutyError,
};
use config::{Config, Environment, FileFormat};
use routy_network::{RoadNetwork, UnknownLocationPolicy};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, sync::Arc};

/// configuration shipped with the crate
pub const DEFAULT_CONFIG: &str = include_str!("routy-default.toml");

/// prefix of environment variables overriding configuration values, for example
/// `ROUTY__PREDICTOR__LIVE_WEIGHT=0.5`
pub const ENV_PREFIX: &str = "ROUTY";
pub const ENV_SEPARATOR: &str = "__";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RoutyConfig {
    pub network: NetworkConfig,
    #[serde(default)]
    pub traffic_pattern: TrafficPatternConfig,
    #[serde(default)]
    pub predictor: PredictorConfig,
    #[serde(default)]
    pub live_traffic: LiveTrafficConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub training: TrainingConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct NetworkConfig {
    pub locations: Vec<String>,
    pub edges: Vec<EdgeConfig>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EdgeConfig {
    pub start: String,
    pub end: String,
    /// traffic-free travel time in minutes
    pub base_weight: f64,
}

/// source of the live delay factor
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveTrafficConfig {
    #[default]
    None,
    Fixed {
        delay: f64,
    },
    Autobahn(AutobahnSignalConfig),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct OptimizerConfig {
    /// trained value model artifact. routing is deterministic when absent or
    /// unreadable.
    pub policy_file: Option<String>,
    pub unknown_location_policy: UnknownLocationPolicy,
}

impl NetworkConfig {
    /// builds the road network. every edge endpoint must be a declared location.
    pub fn build(&self) -> Result<RoadNetwork, RoutyError> {
        let declared: HashSet<&str> = self.locations.iter().map(|l| l.as_str()).collect();
        let mut network = RoadNetwork::new();
        for location in self.locations.iter() {
            network.add_location(location);
        }
        for edge in self.edges.iter() {
            for endpoint in [&edge.start, &edge.end] {
                if !declared.contains(endpoint.as_str()) {
                    return Err(RoutyError::ConfigurationError(format!(
                        "edge ({}, {}) references undeclared location '{}'",
                        edge.start, edge.end, endpoint
                    )));
                }
            }
            network.add_edge(&edge.start, &edge.end, edge.base_weight)?;
        }
        log::info!(
            "built road network with {} locations and {} edges",
            network.n_locations(),
            network.n_edges()
        );
        Ok(network)
    }
}

impl LiveTrafficConfig {
    pub fn build(&self) -> Result<Arc<dyn TrafficSignal>, RoutyError> {
        match self {
            LiveTrafficConfig::None => Ok(Arc::new(NoLiveTraffic)),
            LiveTrafficConfig::Fixed { delay } => {
                if !(0.0..=1.0).contains(delay) {
                    return Err(RoutyError::ConfigurationError(format!(
                        "fixed live traffic delay must be within [0, 1], found {delay}"
                    )));
                }
                Ok(Arc::new(FixedTrafficSignal(*delay)))
            }
            LiveTrafficConfig::Autobahn(conf) => {
                log::info!("using Autobahn live traffic from {}", conf.url);
                let signal = AutobahnTrafficSignal::new(conf)?;
                Ok(Arc::new(signal))
            }
        }
    }
}

impl RoutyConfig {
    /// the configuration shipped with the crate, with environment overrides.
    pub fn default_config() -> Result<RoutyConfig, RoutyError> {
        let source = config::File::from_str(DEFAULT_CONFIG, FileFormat::Toml);
        RoutyConfig::from_source(source, "default configuration")
    }

    /// reads a `.toml` or `.json` configuration file, with environment overrides.
    pub fn from_file(f: &str) -> Result<RoutyConfig, RoutyError> {
        let format = if f.ends_with(".toml") {
            FileFormat::Toml
        } else if f.ends_with(".json") {
            FileFormat::Json
        } else {
            return Err(RoutyError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )));
        };
        RoutyConfig::from_source(config::File::new(f, format), f)
    }

    /// the file when one is given, otherwise the default configuration
    pub fn load(f: Option<&String>) -> Result<RoutyConfig, RoutyError> {
        match f {
            None => RoutyConfig::default_config(),
            Some(f) => {
                log::info!("reading routy configuration from {f}");
                RoutyConfig::try_from(f)
            }
        }
    }

    fn from_source<S>(source: S, name: &str) -> Result<RoutyConfig, RoutyError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        RoutyConfig::from_sources(source, environment(), name)
    }

    fn from_sources<S>(source: S, env: Environment, name: &str) -> Result<RoutyConfig, RoutyError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(source)
            .add_source(env)
            .build()
            .map_err(|e| RoutyError::ConfigurationError(format!("failure reading {name}: {e}")))?;
        config
            .try_deserialize::<RoutyConfig>()
            .map_err(|e| RoutyError::ConfigurationError(format!("failure decoding {name}: {e}")))
    }
}

/// `ROUTY__SECTION__KEY` variables override file values
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

impl TryFrom<&String> for RoutyConfig {
    type Error = RoutyError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        RoutyConfig::from_file(f)
    }
}
