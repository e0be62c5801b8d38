use super::{
    order::deterministic_sequence, route_optimizer::greedy_choice, value_model::leg_minutes,
    FeatureWeights, LinearValueModel, Order, OrderFeatures, PolicyState, TrainingConfig,
};
use crate::model::{random::RandomSource, RoutyError};
use kdam::tqdm;
use routy_network::RoadNetwork;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// summary of one call to [`PolicyTrainer::train`]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub episodes: usize,
    pub learning_rate: f64,
    pub discount: f64,
    pub epsilon: f64,
    /// mean undiscounted reward per episode
    pub average_reward: f64,
    pub total_steps: usize,
    pub weights: FeatureWeights,
}

/// one served order of a rollout
struct Step {
    features: OrderFeatures,
    reward: f64,
}

/// fits a [`LinearValueModel`] on simulated order batches.
///
/// each episode samples a batch over the network's locations and rolls it out
/// with an epsilon-greedy policy. serving an order costs the time its pickup
/// waited, weighted by urgency, so the learned values favor urgent and nearby
/// orders. discounted returns update the weights by normalized least mean
/// squares, which keeps the update stable for any feature scale.
pub struct PolicyTrainer {
    config: TrainingConfig,
    random: Arc<dyn RandomSource>,
    model: LinearValueModel,
    history: Vec<TrainingReport>,
}

impl PolicyTrainer {
    pub fn new(
        config: TrainingConfig,
        random: Arc<dyn RandomSource>,
    ) -> Result<PolicyTrainer, RoutyError> {
        config.validate()?;
        Ok(PolicyTrainer {
            config,
            random,
            model: LinearValueModel::default(),
            history: vec![],
        })
    }

    /// continue training from existing weights
    pub fn with_model(mut self, model: LinearValueModel) -> PolicyTrainer {
        self.model = model;
        self
    }

    pub fn model(&self) -> &LinearValueModel {
        &self.model
    }

    pub fn into_model(self) -> LinearValueModel {
        self.model
    }

    pub fn history(&self) -> &[TrainingReport] {
        &self.history
    }

    pub fn train(
        &mut self,
        network: &RoadNetwork,
        episodes: usize,
    ) -> Result<TrainingReport, RoutyError> {
        if episodes == 0 {
            return Err(RoutyError::ConfigurationError(String::from(
                "training requires at least one episode",
            )));
        }
        let locations = network.get_all_locations();
        if locations.len() < 2 {
            return Err(RoutyError::ConfigurationError(format!(
                "training requires at least two locations, network has {}",
                locations.len()
            )));
        }
        log::info!(
            "training routing policy for {} episodes over {} locations",
            episodes,
            locations.len()
        );

        let mut total_reward = 0.0;
        let mut total_steps = 0;
        let episode_iter = tqdm!(0..episodes, total = episodes, desc = "policy training");
        for _ in episode_iter {
            let orders = self.sample_orders(&locations);
            let steps = self.rollout(network, &orders);
            total_reward += steps.iter().map(|s| s.reward).sum::<f64>();
            total_steps += steps.len();
            self.update(&steps)?;
        }
        eprintln!();

        self.model.episodes_trained += episodes;
        let report = TrainingReport {
            episodes,
            learning_rate: self.config.learning_rate,
            discount: self.config.discount,
            epsilon: self.config.epsilon,
            average_reward: total_reward / episodes as f64,
            total_steps,
            weights: self.model.weights,
        };
        log::info!(
            "training finished: average reward {:.3} over {} steps",
            report.average_reward,
            report.total_steps
        );
        self.history.push(report.clone());
        Ok(report)
    }

    fn sample_orders(&self, locations: &[String]) -> Vec<Order> {
        let last = locations.len() as i64 - 1;
        (0..self.config.orders_per_episode)
            .map(|order_id| {
                let start = self.random.uniform_int(0, last);
                // draw from the remaining locations so start and end differ
                let mut end = self.random.uniform_int(0, last - 1);
                if end >= start {
                    end += 1;
                }
                let priority = self.random.uniform_int(1, self.config.max_priority);
                Order::new(
                    order_id as u64,
                    &locations[start as usize],
                    &locations[end as usize],
                    priority,
                )
            })
            .collect()
    }

    fn rollout(&self, network: &RoadNetwork, orders: &[Order]) -> Vec<Step> {
        let max_priority = self.config.max_priority as f64;
        let mut remaining = deterministic_sequence(orders);
        let mut steps = Vec::with_capacity(remaining.len());
        let mut current: Option<&str> = None;
        let mut elapsed_hours = 0.0;
        while !remaining.is_empty() {
            let state = PolicyState { network, current };
            let position = if self.random.is_hit(self.config.epsilon) {
                self.random.uniform_int(0, remaining.len() as i64 - 1) as usize
            } else {
                greedy_choice(&state, orders, &remaining, &self.model)
            };
            let order = &orders[remaining.remove(position)];
            let features = OrderFeatures::of(&state, order);

            elapsed_hours += features.approach_hours;
            let urgency = (max_priority + 1.0 - order.priority as f64) / max_priority;
            let reward = -elapsed_hours * urgency;
            elapsed_hours +=
                leg_minutes(network, &order.start_location, &order.end_location) / 60.0;

            steps.push(Step { features, reward });
            current = Some(order.end_location.as_str());
        }
        steps
    }

    fn update(&mut self, steps: &[Step]) -> Result<(), RoutyError> {
        let mut weights = self.model.weights.as_array();
        let mut discounted_return = 0.0;
        for step in steps.iter().rev() {
            discounted_return = step.reward + self.config.discount * discounted_return;
            let x = step.features.as_array();
            let estimate: f64 = weights.iter().zip(x.iter()).map(|(w, x)| w * x).sum();
            let norm: f64 = 1.0 + x.iter().map(|v| v * v).sum::<f64>();
            let step_size = self.config.learning_rate * (discounted_return - estimate) / norm;
            for (w, x) in weights.iter_mut().zip(x.iter()) {
                *w += step_size * x;
            }
        }
        let updated = FeatureWeights::from_array(weights);
        if !updated.is_finite() {
            return Err(RoutyError::InternalError(String::from(
                "policy training diverged to non-finite weights",
            )));
        }
        self.model.weights = updated;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{
        optimizer::{RouteOptimizer, RoutingPolicy},
        random::SeededRandom,
    };

    fn network() -> RoadNetwork {
        let mut network = RoadNetwork::new();
        network.add_edge("Berlin", "Hamburg", 180.0).unwrap();
        network.add_edge("Berlin", "Leipzig", 120.0).unwrap();
        network.add_edge("Leipzig", "Frankfurt", 240.0).unwrap();
        network.add_edge("Hamburg", "Bremen", 60.0).unwrap();
        network.add_location("Dresden");
        network
    }

    fn trainer(seed: u64) -> PolicyTrainer {
        let config = TrainingConfig {
            seed: Some(seed),
            ..Default::default()
        };
        PolicyTrainer::new(config, Arc::new(SeededRandom::new(seed))).unwrap()
    }

    #[test]
    fn test_seeded_training_is_reproducible() {
        let mut a = trainer(11);
        let mut b = trainer(11);
        let report_a = a.train(&network(), 50).unwrap();
        let report_b = b.train(&network(), 50).unwrap();
        assert_eq!(report_a, report_b);
        assert_eq!(a.model(), b.model());
    }

    #[test]
    fn test_training_report_and_history() {
        let mut trainer = trainer(3);
        let first = trainer.train(&network(), 20).unwrap();
        assert_eq!(first.episodes, 20);
        assert_eq!(first.total_steps, 20 * 4);
        assert_eq!(first.learning_rate, 0.01);
        assert!(first.average_reward <= 0.0);
        trainer.train(&network(), 30).unwrap();
        assert_eq!(trainer.history().len(), 2);
        assert_eq!(trainer.model().episodes_trained, 50);
        assert!(trainer.model().weights.is_finite());
    }

    #[test]
    fn test_trained_policy_is_deterministic() {
        let mut trainer = trainer(5);
        trainer.train(&network(), 100).unwrap();
        let optimizer =
            RouteOptimizer::new(RoutingPolicy::Learned(Arc::new(trainer.into_model())));
        let orders = vec![
            Order::new(1, "Berlin", "Hamburg", 2),
            Order::new(2, "Leipzig", "Frankfurt", 1),
            Order::new(3, "Hamburg", "Bremen", 3),
        ];
        let network = network();
        let first = optimizer.optimize(&network, &orders).unwrap();
        for _ in 0..3 {
            assert_eq!(optimizer.optimize(&network, &orders).unwrap(), first);
        }
    }

    #[test]
    fn test_training_preconditions() {
        let mut small = RoadNetwork::new();
        small.add_location("Berlin");
        let mut trainer = trainer(1);
        assert!(matches!(
            trainer.train(&small, 10),
            Err(RoutyError::ConfigurationError(_))
        ));
        assert!(matches!(
            trainer.train(&network(), 0),
            Err(RoutyError::ConfigurationError(_))
        ));
        let bad = TrainingConfig {
            epsilon: 2.0,
            ..Default::default()
        };
        assert!(PolicyTrainer::new(bad, Arc::new(SeededRandom::new(1))).is_err());
    }
}
