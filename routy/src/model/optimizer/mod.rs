mod order;
mod policy_trainer;
mod route;
mod route_optimizer;
mod routing_policy;
mod training_config;
mod value_model;

pub use order::{deterministic_sequence, validate_orders, Order, DEFAULT_PRIORITY};
pub use policy_trainer::{PolicyTrainer, TrainingReport};
pub use route::Route;
pub use route_optimizer::RouteOptimizer;
pub use routing_policy::RoutingPolicy;
pub use training_config::TrainingConfig;
pub use value_model::{
    leg_minutes, FeatureWeights, LinearValueModel, OrderFeatures, PolicyState, ValueModel,
    UNREACHABLE_MINUTES,
};
