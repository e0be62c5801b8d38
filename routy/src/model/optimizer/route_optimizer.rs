use super::{
    order::{deterministic_sequence, validate_orders},
    Order, PolicyState, Route, RoutingPolicy, ValueModel,
};
use crate::model::RoutyError;
use routy_network::{NetworkError, RoadNetwork};

/// scores closer than this are treated as equal
const SCORE_EPSILON: f64 = 1e-9;

/// sequences order batches into a stop list under a [`RoutingPolicy`].
#[derive(Debug, Clone, Default)]
pub struct RouteOptimizer {
    policy: RoutingPolicy,
}

impl RouteOptimizer {
    pub fn new(policy: RoutingPolicy) -> RouteOptimizer {
        RouteOptimizer { policy }
    }

    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    /// orders the stops of a batch. each order contributes its start and end,
    /// with a stop equal to the previous one emitted once. every endpoint must be
    /// a location of the network under either policy.
    pub fn optimize(
        &self,
        network: &RoadNetwork,
        orders: &[Order],
    ) -> Result<Vec<String>, RoutyError> {
        validate_orders(orders)?;
        for order in orders.iter() {
            network.location_id(&order.start_location)?;
            network.location_id(&order.end_location)?;
        }
        let sequence = self.sequence(network, orders);
        log::debug!(
            "{} policy sequenced {} orders",
            self.policy.name(),
            orders.len()
        );
        Ok(stops_for(orders, &sequence))
    }

    /// stop list plus the travel time between consecutive stops over current
    /// edge weights.
    pub fn plan(&self, network: &RoadNetwork, orders: &[Order]) -> Result<Route, RoutyError> {
        let stops = self.optimize(network, orders)?;
        let estimated_duration_minutes = stops
            .windows(2)
            .map(|leg| network.shortest_path_length(&leg[0], &leg[1]))
            .sum::<Result<f64, NetworkError>>()?;
        Ok(Route {
            stops,
            estimated_duration_minutes,
            total_orders: orders.len(),
        })
    }

    /// indices into `orders` in service order.
    pub fn sequence(&self, network: &RoadNetwork, orders: &[Order]) -> Vec<usize> {
        let deterministic = deterministic_sequence(orders);
        match &self.policy {
            RoutingPolicy::Deterministic => deterministic,
            RoutingPolicy::Learned(model) => {
                learned_sequence(network, orders, deterministic, model.as_ref())
            }
        }
    }
}

/// greedy rollout of a value model starting from no location. `remaining` holds
/// the deterministic sequence, which settles ties.
fn learned_sequence(
    network: &RoadNetwork,
    orders: &[Order],
    mut remaining: Vec<usize>,
    model: &dyn ValueModel,
) -> Vec<usize> {
    let mut sequence = Vec::with_capacity(remaining.len());
    let mut current: Option<&str> = None;
    while !remaining.is_empty() {
        let state = PolicyState { network, current };
        let position = greedy_choice(&state, orders, &remaining, model);
        let next = remaining.remove(position);
        current = Some(orders[next].end_location.as_str());
        sequence.push(next);
    }
    sequence
}

/// position in `remaining` of the best scoring order, the first one on ties.
/// non-finite scores rank last.
pub(crate) fn greedy_choice(
    state: &PolicyState<'_>,
    orders: &[Order],
    remaining: &[usize],
    model: &dyn ValueModel,
) -> usize {
    let mut best_position = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (position, idx) in remaining.iter().enumerate() {
        let score = model.score(state, &orders[*idx]);
        let score = if score.is_finite() {
            score
        } else {
            f64::NEG_INFINITY
        };
        if position == 0 || score > best_score + SCORE_EPSILON {
            best_position = position;
            best_score = score;
        }
    }
    best_position
}

pub(crate) fn stops_for(orders: &[Order], sequence: &[usize]) -> Vec<String> {
    let mut stops: Vec<String> = Vec::with_capacity(sequence.len() * 2);
    for idx in sequence.iter() {
        let order = &orders[*idx];
        for stop in [&order.start_location, &order.end_location] {
            if stops.last() != Some(stop) {
                stops.push(stop.clone());
            }
        }
    }
    stops
}
