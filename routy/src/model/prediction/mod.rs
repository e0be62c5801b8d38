pub mod departure_ops;
mod departure_search;
mod hourly_forecast;
mod prediction;
mod predictor_config;
mod travel_time_predictor;

pub use departure_search::{DepartureOption, DepartureQuery, DepartureRecommendation};
pub use hourly_forecast::{HourlyForecast, HourlyForecastIter};
pub use prediction::Prediction;
pub use predictor_config::PredictorConfig;
pub(crate) use travel_time_predictor::LiveReading;
pub use travel_time_predictor::{ResolvedDelay, TravelTimePredictor};
