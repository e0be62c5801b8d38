use super::{departure_ops, HourlyForecast, Prediction, PredictorConfig};
use crate::model::{
    random::RandomSource,
    traffic::{live_delay_or_zero, TrafficLevel, TrafficPattern, TrafficSignal},
    RoutyError,
};
use chrono::NaiveDateTime;
use routy_network::{RoadNetwork, WeightKind};
use std::{cell::OnceCell, sync::Arc};

/// time-aware travel time forecasts over a [`RoadNetwork`].
///
/// base travel times come from the network's traffic-free weights, so ad-hoc
/// `update_traffic` calls do not leak into forecasts. delay is modeled from the
/// historical [`TrafficPattern`], blended with the live [`TrafficSignal`] for
/// near-term departures, plus bounded jitter drawn from the injected
/// [`RandomSource`].
pub struct TravelTimePredictor {
    pattern: TrafficPattern,
    signal: Arc<dyn TrafficSignal>,
    random: Arc<dyn RandomSource>,
    config: PredictorConfig,
}

/// delay resolved for one departure, before it is applied to a base time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedDelay {
    pub delay_factor: f64,
    pub near_term: bool,
}

/// the live signal as read by one query. the signal is consulted at most once,
/// on the first near-term departure.
#[derive(Debug, Default)]
pub(crate) struct LiveReading(OnceCell<f64>);

impl LiveReading {
    fn delay(&self, signal: &dyn TrafficSignal) -> f64 {
        *self.0.get_or_init(|| live_delay_or_zero(signal))
    }
}

impl TravelTimePredictor {
    pub fn new(
        pattern: TrafficPattern,
        signal: Arc<dyn TrafficSignal>,
        random: Arc<dyn RandomSource>,
        config: PredictorConfig,
    ) -> Result<TravelTimePredictor, RoutyError> {
        config.validate()?;
        Ok(TravelTimePredictor {
            pattern,
            signal,
            random,
            config,
        })
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    pub fn pattern(&self) -> &TrafficPattern {
        &self.pattern
    }

    pub fn signal(&self) -> &dyn TrafficSignal {
        self.signal.as_ref()
    }

    /// traffic-free shortest travel time between two locations, in minutes.
    pub fn base_time(
        &self,
        network: &RoadNetwork,
        start: &str,
        end: &str,
    ) -> Result<f64, RoutyError> {
        let shortest = network.shortest_path_by(start, end, WeightKind::Base)?;
        Ok(shortest.length)
    }

    /// predicts the travel time for departing at `departure_time`, evaluated at
    /// the instant `now`.
    pub fn predict(
        &self,
        network: &RoadNetwork,
        start: &str,
        end: &str,
        departure_time: &NaiveDateTime,
        now: &NaiveDateTime,
    ) -> Result<Prediction, RoutyError> {
        let base = self.base_time(network, start, end)?;
        let live = LiveReading::default();
        Ok(self.predict_with_base(start, end, base, departure_time, now, &live))
    }

    /// as [`TravelTimePredictor::predict`], with the departure given as text.
    pub fn predict_at(
        &self,
        network: &RoadNetwork,
        start: &str,
        end: &str,
        departure_time: &str,
        now: &NaiveDateTime,
    ) -> Result<Prediction, RoutyError> {
        let departure = departure_ops::parse_departure(departure_time)?;
        self.predict(network, start, end, &departure, now)
    }

    /// hourly predictions starting at `now`. the route and the departure range
    /// are checked once up front, so errors surface here rather than per element.
    pub fn hourly_forecast<'a>(
        &'a self,
        network: &RoadNetwork,
        start: &str,
        end: &str,
        now: &NaiveDateTime,
        hours: usize,
    ) -> Result<HourlyForecast<'a>, RoutyError> {
        let base = self.base_time(network, start, end)?;
        self.forecast_from_base(start, end, base, now, hours)
    }

    pub(crate) fn forecast_from_base<'a>(
        &'a self,
        start: &str,
        end: &str,
        base: f64,
        now: &NaiveDateTime,
        hours: usize,
    ) -> Result<HourlyForecast<'a>, RoutyError> {
        if let Some(last) = hours.checked_sub(1) {
            i64::try_from(last)
                .ok()
                .and_then(|last| departure_ops::hours_after(now, last))
                .ok_or_else(|| {
                    RoutyError::TimeOutOfRange(format!("{now} + {last} hours"))
                })?;
        }
        Ok(HourlyForecast::new(self, start, end, base, *now, hours))
    }

    pub(crate) fn predict_with_base(
        &self,
        start: &str,
        end: &str,
        base: f64,
        departure_time: &NaiveDateTime,
        now: &NaiveDateTime,
        live: &LiveReading,
    ) -> Prediction {
        let resolved = self.resolve_with(departure_time, now, live);
        let predicted = base * (1.0 + resolved.delay_factor);
        let confidence = if resolved.near_term {
            self.config.near_term_confidence
        } else {
            self.config.long_term_confidence
        };
        log::debug!(
            "{start} -> {end} departing {departure_time}: base {base:.1} min, delay {:.3}, near term {}",
            resolved.delay_factor,
            resolved.near_term
        );
        Prediction {
            start: start.to_string(),
            end: end.to_string(),
            departure_time: *departure_time,
            base_time_minutes: base,
            predicted_time_minutes: predicted,
            delay_factor: resolved.delay_factor,
            delay_minutes: predicted - base,
            traffic_level: TrafficLevel::from_delay(resolved.delay_factor),
            confidence,
        }
    }

    /// delay factor for a departure: historical pattern, blended with the live
    /// signal inside the near-term horizon, then jittered and clamped to [0, 1].
    pub fn resolve_delay(&self, departure_time: &NaiveDateTime, now: &NaiveDateTime) -> ResolvedDelay {
        self.resolve_with(departure_time, now, &LiveReading::default())
    }

    fn resolve_with(
        &self,
        departure_time: &NaiveDateTime,
        now: &NaiveDateTime,
        live: &LiveReading,
    ) -> ResolvedDelay {
        let near_term = self.is_near_term(departure_time, now);
        let pattern_delay = self.pattern.baseline_delay(departure_time);
        let raw_delay = if near_term {
            let live_delay = live.delay(self.signal.as_ref());
            self.config.live_weight * live_delay + (1.0 - self.config.live_weight) * pattern_delay
        } else {
            pattern_delay
        };
        let spread = self.config.jitter_ratio * raw_delay;
        let jitter = if spread > 0.0 {
            self.random.uniform_real(-spread, spread)
        } else {
            0.0
        };
        ResolvedDelay {
            delay_factor: (raw_delay + jitter).clamp(0.0, 1.0),
            near_term,
        }
    }

    /// true when the departure lies within [now, now + horizon].
    pub fn is_near_term(&self, departure_time: &NaiveDateTime, now: &NaiveDateTime) -> bool {
        let hours_until = (*departure_time - *now).num_seconds() as f64 / 3600.0;
        (0.0..=self.config.near_term_horizon_hours).contains(&hours_until)
    }
}
