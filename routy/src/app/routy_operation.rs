use super::order_file;
use crate::config::RoutyConfig;
use crate::model::{
    optimizer::PolicyTrainer,
    prediction::{departure_ops, DepartureQuery},
    random::SeededRandom,
    RoutingService, RoutyError,
};
use chrono::{Local, NaiveDateTime};
use clap::Subcommand;
use itertools::Itertools;
use serde::Serialize;
use std::sync::Arc;

/// a traffic observation given on the command line as `start:end:delay`
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficUpdate {
    pub start: String,
    pub end: String,
    pub delay_factor: f64,
}

pub fn parse_traffic_update(value: &str) -> Result<TrafficUpdate, String> {
    let parts = value.split(':').collect_vec();
    match parts.as_slice() {
        [start, end, delay] => {
            let delay_factor = delay
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid delay factor '{delay}': {e}"))?;
            Ok(TrafficUpdate {
                start: start.trim().to_string(),
                end: end.trim().to_string(),
                delay_factor,
            })
        }
        _ => Err(format!(
            "expected traffic update as start:end:delay, found '{value}'"
        )),
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum RoutyOperation {
    /// predict the travel time between two locations
    Predict {
        start: String,
        end: String,
        /// departure time, defaults to now
        #[arg(long)]
        departure: Option<String>,
    },
    /// find the departure hour with the shortest predicted travel time
    OptimalDeparture {
        start: String,
        end: String,
        /// number of whole-hour departures to compare, starting now
        #[arg(long, default_value_t = 12)]
        hours_window: i64,
        /// prefer departures arriving no later than this time
        #[arg(long)]
        latest_arrival: Option<String>,
    },
    /// hourly travel time predictions starting now
    Forecast {
        start: String,
        end: String,
        #[arg(long, default_value_t = 24)]
        hours: usize,
    },
    /// sequence a batch of orders into a route
    Optimize {
        /// .csv or .json file of orders
        order_file: String,
        /// trained policy artifact, overrides the configured one
        #[arg(long)]
        policy_file: Option<String>,
        /// traffic observations applied before planning, as start:end:delay
        #[arg(long = "update", value_parser = parse_traffic_update)]
        updates: Vec<TrafficUpdate>,
    },
    /// list edges whose delay factor reaches a threshold
    Congestion {
        #[arg(long, default_value_t = 0.5)]
        threshold: f64,
        /// traffic observations applied before the query, as start:end:delay
        #[arg(long = "update", value_parser = parse_traffic_update)]
        updates: Vec<TrafficUpdate>,
    },
    /// live traffic summary between two locations
    Traffic { start: String, end: String },
    /// train a routing policy on simulated order batches
    Train {
        /// output path for the trained model artifact
        #[arg(long)]
        output_file: String,
        /// number of episodes, overrides the configured count
        #[arg(long)]
        episodes: Option<usize>,
    },
}

impl RoutyOperation {
    /// runs the operation and returns its result as pretty-printed JSON.
    pub fn run(&self, conf: &RoutyConfig) -> Result<String, RoutyError> {
        let now = local_now();
        match self {
            RoutyOperation::Predict {
                start,
                end,
                departure,
            } => {
                let service = RoutingService::try_from(conf)?;
                let departure = match departure {
                    Some(d) => departure_ops::parse_departure(d)?,
                    None => now,
                };
                let prediction = service.predict(start, end, &departure, &now)?;
                to_json(&prediction)
            }
            RoutyOperation::OptimalDeparture {
                start,
                end,
                hours_window,
                latest_arrival,
            } => {
                let service = RoutingService::try_from(conf)?;
                let latest_arrival = latest_arrival
                    .as_deref()
                    .map(departure_ops::parse_departure)
                    .transpose()?;
                let query = DepartureQuery {
                    start,
                    end,
                    now,
                    hours_window: *hours_window,
                    latest_arrival,
                };
                let result = service.search_departures(&query)?;
                to_json(&result)
            }
            RoutyOperation::Forecast { start, end, hours } => {
                let service = RoutingService::try_from(conf)?;
                let forecast = service.hourly_forecast(start, end, &now, *hours)?;
                to_json(&forecast.iter().collect_vec())
            }
            RoutyOperation::Optimize {
                order_file,
                policy_file,
                updates,
            } => {
                let mut conf = conf.clone();
                if policy_file.is_some() {
                    conf.optimizer.policy_file = policy_file.clone();
                }
                let service = RoutingService::try_from(&conf)?;
                apply_updates(&service, updates)?;
                let orders = order_file::read_orders(order_file)?;
                let route = service.plan(&orders)?;
                to_json(&route)
            }
            RoutyOperation::Congestion { threshold, updates } => {
                let service = RoutingService::try_from(conf)?;
                apply_updates(&service, updates)?;
                let congested = service.congested_routes(*threshold)?;
                to_json(&congested)
            }
            RoutyOperation::Traffic { start, end } => {
                let service = RoutingService::try_from(conf)?;
                let info = service.traffic_info(start, end)?;
                to_json(&info)
            }
            RoutyOperation::Train {
                output_file,
                episodes,
            } => {
                let network = conf.network.build()?;
                let random = Arc::new(SeededRandom::from_seed_option(conf.training.seed));
                let mut trainer = PolicyTrainer::new(conf.training.clone(), random)?;
                let episodes = episodes.unwrap_or(conf.training.episodes);
                let report = trainer.train(&network, episodes)?;
                trainer.model().save(output_file)?;
                log::info!("wrote trained routing policy to {output_file}");
                to_json(&report)
            }
        }
    }
}

fn apply_updates(service: &RoutingService, updates: &[TrafficUpdate]) -> Result<(), RoutyError> {
    for update in updates.iter() {
        service.update_traffic(&update.start, &update.end, update.delay_factor)?;
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, RoutyError> {
    let json = serde_json::to_string_pretty(value)?;
    Ok(json)
}

/// current local wall-clock time, the evaluation instant of every operation
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
