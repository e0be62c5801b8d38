pub mod optimizer;
pub mod prediction;
pub mod random;
mod routing_service;
mod routy_error;
pub mod traffic;

pub use routing_service::RoutingService;
pub use routy_error::RoutyError;
