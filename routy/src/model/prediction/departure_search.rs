use super::{departure_ops, LiveReading, Prediction, TravelTimePredictor};
use crate::model::RoutyError;
use chrono::NaiveDateTime;
use itertools::Itertools;
use routy_network::RoadNetwork;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// parameters of a departure window search.
#[derive(Debug, Clone)]
pub struct DepartureQuery<'a> {
    pub start: &'a str,
    pub end: &'a str,
    pub now: NaiveDateTime,
    /// number of whole-hour candidates, starting at `now`
    pub hours_window: i64,
    /// when set, the recommendation prefers departures arriving by this time
    pub latest_arrival: Option<NaiveDateTime>,
}

/// one evaluated departure candidate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DepartureOption {
    #[serde(flatten)]
    pub prediction: Prediction,
    pub arrival_time: NaiveDateTime,
    pub hour_offset: i64,
    pub meets_deadline: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DepartureRecommendation {
    pub recommendation: DepartureOption,
    /// every other candidate, fastest first
    pub alternatives: Vec<DepartureOption>,
    pub total_options: usize,
    pub search_window_hours: i64,
}

impl TravelTimePredictor {
    /// best departure among the whole hours `now + 0h .. now + (hours_window - 1)h`.
    pub fn find_optimal_departure(
        &self,
        network: &RoadNetwork,
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
        self.search_departures(network, &query)
    }

    /// evaluates every candidate hour of the query window. the recommendation is the
    /// fastest option meeting the deadline, or the fastest overall when none do.
    /// ties go to the earliest departure.
    pub fn search_departures(
        &self,
        network: &RoadNetwork,
        query: &DepartureQuery<'_>,
    ) -> Result<DepartureRecommendation, RoutyError> {
        if query.hours_window <= 0 {
            return Err(RoutyError::InvalidWindow(query.hours_window));
        }
        let base = self.base_time(network, query.start, query.end)?;
        self.search_from_base(query, base)
    }

    /// the search over an already resolved traffic-free travel time.
    pub(crate) fn search_from_base(
        &self,
        query: &DepartureQuery<'_>,
        base: f64,
    ) -> Result<DepartureRecommendation, RoutyError> {
        if query.hours_window <= 0 {
            return Err(RoutyError::InvalidWindow(query.hours_window));
        }
        let live = LiveReading::default();

        // candidates are evaluated in departure order so a seeded jitter stream
        // yields the same result on every run
        let options = (0..query.hours_window)
            .map(|hour_offset| {
                let departure = departure_ops::hours_after(&query.now, hour_offset)
                    .ok_or_else(|| {
                        RoutyError::TimeOutOfRange(format!("{} + {hour_offset} hours", query.now))
                    })?;
                let prediction = self.predict_with_base(
                    query.start,
                    query.end,
                    base,
                    &departure,
                    &query.now,
                    &live,
                );
                let arrival_time = prediction.arrival_time()?;
                let meets_deadline = query
                    .latest_arrival
                    .map(|deadline| arrival_time <= deadline)
                    .unwrap_or(true);
                Ok(DepartureOption {
                    prediction,
                    arrival_time,
                    hour_offset,
                    meets_deadline,
                })
            })
            .collect::<Result<Vec<_>, RoutyError>>()?;

        let total_options = options.len();
        let any_feasible = options.iter().any(|o| o.meets_deadline);
        let best_index = options
            .iter()
            .enumerate()
            .filter(|(_, o)| o.meets_deadline || !any_feasible)
            .min_by(|(_, a), (_, b)| compare_options(a, b))
            .map(|(index, _)| index)
            .ok_or_else(|| {
                RoutyError::InternalError(String::from("departure search produced no candidates"))
            })?;

        let mut alternatives = options;
        let recommendation = alternatives.remove(best_index);
        alternatives.sort_by(compare_options);

        if !recommendation.meets_deadline {
            log::warn!(
                "no departure from {} to {} within {} hours meets the arrival deadline",
                query.start,
                query.end,
                query.hours_window
            );
        }
        log::info!(
            "recommended departure {} from {} to {}, {:.1} minutes predicted",
            recommendation.prediction.departure_time,
            query.start,
            query.end,
            recommendation.prediction.predicted_time_minutes
        );

        Ok(DepartureRecommendation {
            recommendation,
            alternatives,
            total_options,
            search_window_hours: query.hours_window,
        })
    }
}

/// fastest first, then earliest departure
fn compare_options(a: &DepartureOption, b: &DepartureOption) -> Ordering {
    a.prediction
        .predicted_time_minutes
        .total_cmp(&b.prediction.predicted_time_minutes)
        .then_with(|| a.hour_offset.cmp(&b.hour_offset))
}
