mod routy_config;

pub use routy_config::{
    EdgeConfig, LiveTrafficConfig, NetworkConfig, OptimizerConfig, RoutyConfig, DEFAULT_CONFIG,
    ENV_PREFIX, ENV_SEPARATOR,
};
