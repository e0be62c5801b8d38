use super::{
    optimizer::{Order, Route, RouteOptimizer, RoutingPolicy},
    prediction::{
        DepartureQuery, DepartureRecommendation, HourlyForecast, LiveReading, Prediction,
        TravelTimePredictor,
    },
    random::SeededRandom,
    traffic::{route_traffic_info, TrafficInfo, TrafficPattern},
    RoutyError,
};
use crate::config::RoutyConfig;
use chrono::NaiveDateTime;
use itertools::Itertools;
use routy_network::{EdgeSummary, SharedRoadNetwork, UnknownLocationPolicy};
use std::sync::Arc;

/// the planner's service object: one shared road network together with the
/// predictor and optimizer that query it. built once and passed by reference.
///
/// queries first resolve their locations under the configured
/// [`UnknownLocationPolicy`], then run against a read lock of the network.
/// predictions hold the lock only while the base travel time is searched, so
/// live traffic reads never block writers.
pub struct RoutingService {
    network: SharedRoadNetwork,
    predictor: TravelTimePredictor,
    optimizer: RouteOptimizer,
    location_policy: UnknownLocationPolicy,
}

impl RoutingService {
    pub fn new(
        network: SharedRoadNetwork,
        predictor: TravelTimePredictor,
        optimizer: RouteOptimizer,
        location_policy: UnknownLocationPolicy,
    ) -> RoutingService {
        RoutingService {
            network,
            predictor,
            optimizer,
            location_policy,
        }
    }

    pub fn network(&self) -> &SharedRoadNetwork {
        &self.network
    }

    pub fn predictor(&self) -> &TravelTimePredictor {
        &self.predictor
    }

    pub fn optimizer(&self) -> &RouteOptimizer {
        &self.optimizer
    }

    pub fn predict(
        &self,
        start: &str,
        end: &str,
        departure_time: &NaiveDateTime,
        now: &NaiveDateTime,
    ) -> Result<Prediction, RoutyError> {
        let base = self.base_time(start, end)?;
        let live = LiveReading::default();
        Ok(self
            .predictor
            .predict_with_base(start, end, base, departure_time, now, &live))
    }

    pub fn find_optimal_departure(
        &self,
        start: &str,
        end: &str,
        now: &NaiveDateTime,
        hours_window: i64,
    ) -> Result<DepartureRecommendation, RoutyError> {
        let query = DepartureQuery {
            start,
            end,
            now: *now,
            hours_window,
            latest_arrival: None,
        };
        self.search_departures(&query)
    }

    pub fn search_departures(
        &self,
        query: &DepartureQuery<'_>,
    ) -> Result<DepartureRecommendation, RoutyError> {
        if query.hours_window <= 0 {
            return Err(RoutyError::InvalidWindow(query.hours_window));
        }
        let base = self.base_time(query.start, query.end)?;
        self.predictor.search_from_base(query, base)
    }

    /// the forecast only borrows the predictor, so the network lock is released
    /// before the first element is evaluated.
    pub fn hourly_forecast(
        &self,
        start: &str,
        end: &str,
        now: &NaiveDateTime,
        hours: usize,
    ) -> Result<HourlyForecast<'_>, RoutyError> {
        let base = self.base_time(start, end)?;
        self.predictor
            .forecast_from_base(start, end, base, now, hours)
    }

    pub fn optimize(&self, orders: &[Order]) -> Result<Vec<String>, RoutyError> {
        self.ensure_order_locations(orders)?;
        let network = self.network.read()?;
        self.optimizer.optimize(&network, orders)
    }

    pub fn plan(&self, orders: &[Order]) -> Result<Route, RoutyError> {
        self.ensure_order_locations(orders)?;
        let network = self.network.read()?;
        self.optimizer.plan(&network, orders)
    }

    pub fn update_traffic(&self, a: &str, b: &str, delay_factor: f64) -> Result<(), RoutyError> {
        self.network.update_traffic(a, b, delay_factor)?;
        Ok(())
    }

    pub fn congested_routes(&self, threshold: f64) -> Result<Vec<EdgeSummary>, RoutyError> {
        let network = self.network.read()?;
        let congested = network.get_congested_routes(threshold)?;
        Ok(congested)
    }

    /// live traffic summary between two known locations.
    pub fn traffic_info(&self, start: &str, end: &str) -> Result<TrafficInfo, RoutyError> {
        self.ensure_locations(&[start, end])?;
        Ok(route_traffic_info(self.predictor.signal(), start, end))
    }

    /// traffic-free travel time, read under a lock released on return
    fn base_time(&self, start: &str, end: &str) -> Result<f64, RoutyError> {
        self.ensure_locations(&[start, end])?;
        let network = self.network.read()?;
        self.predictor.base_time(&network, start, end)
    }

    fn ensure_order_locations(&self, orders: &[Order]) -> Result<(), RoutyError> {
        let names = orders
            .iter()
            .flat_map(|o| [o.start_location.as_str(), o.end_location.as_str()])
            .unique()
            .collect_vec();
        self.ensure_locations(&names)
    }

    fn ensure_locations(&self, names: &[&str]) -> Result<(), RoutyError> {
        self.network
            .ensure_locations(names, self.location_policy)?;
        Ok(())
    }
}

impl TryFrom<&RoutyConfig> for RoutingService {
    type Error = RoutyError;

    fn try_from(conf: &RoutyConfig) -> Result<Self, Self::Error> {
        let network = conf.network.build()?;
        let pattern = TrafficPattern::try_from(&conf.traffic_pattern)?;
        let signal = conf.live_traffic.build()?;
        let random = Arc::new(SeededRandom::from_seed_option(conf.predictor.seed));
        let predictor = TravelTimePredictor::new(pattern, signal, random, conf.predictor.clone())?;
        let policy = RoutingPolicy::from_artifact(conf.optimizer.policy_file.as_deref());
        log::info!("routing service using the {} policy", policy.name());
        Ok(RoutingService::new(
            SharedRoadNetwork::new(network),
            predictor,
            RouteOptimizer::new(policy),
            conf.optimizer.unknown_location_policy,
        ))
    }
}
