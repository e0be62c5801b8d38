use crate::model::RoutyError;
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn of(timestamp: &NaiveDateTime) -> DayType {
        match timestamp.weekday() {
            Weekday::Sat | Weekday::Sun => DayType::Weekend,
            _ => DayType::Weekday,
        }
    }
}

/// baseline delay factor observed at a whole hour of the day.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PatternAnchor {
    pub hour: u32,
    pub delay: f64,
}

impl PatternAnchor {
    pub const fn new(hour: u32, delay: f64) -> PatternAnchor {
        PatternAnchor { hour, delay }
    }
}

/// anchors per day type as written in configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrafficPatternConfig {
    pub weekday: Vec<PatternAnchor>,
    pub weekend: Vec<PatternAnchor>,
}

impl Default for TrafficPatternConfig {
    /// rush-hour shaped weekday profile and a flat midday weekend bump.
    fn default() -> Self {
        let weekday = vec![
            PatternAnchor::new(6, 0.3),
            PatternAnchor::new(7, 0.7),
            PatternAnchor::new(8, 0.9),
            PatternAnchor::new(9, 0.6),
            PatternAnchor::new(10, 0.2),
            PatternAnchor::new(12, 0.3),
            PatternAnchor::new(17, 0.8),
            PatternAnchor::new(18, 0.9),
            PatternAnchor::new(19, 0.5),
            PatternAnchor::new(22, 0.1),
        ];
        let weekend = vec![
            PatternAnchor::new(8, 0.1),
            PatternAnchor::new(10, 0.2),
            PatternAnchor::new(12, 0.3),
            PatternAnchor::new(14, 0.4),
            PatternAnchor::new(16, 0.3),
            PatternAnchor::new(18, 0.2),
            PatternAnchor::new(20, 0.1),
        ];
        TrafficPatternConfig { weekday, weekend }
    }
}

/// historical delay table keyed by day type and hour of day. immutable once
/// built; each day type holds at least one anchor, sorted by hour.
#[derive(Clone, Debug, PartialEq)]
pub struct TrafficPattern {
    weekday: Vec<PatternAnchor>,
    weekend: Vec<PatternAnchor>,
}

impl TrafficPattern {
    pub fn new(
        weekday: Vec<PatternAnchor>,
        weekend: Vec<PatternAnchor>,
    ) -> Result<TrafficPattern, RoutyError> {
        Ok(TrafficPattern {
            weekday: validate_anchors(DayType::Weekday, weekday)?,
            weekend: validate_anchors(DayType::Weekend, weekend)?,
        })
    }

    /// a pattern with the same delay at every hour of every day.
    pub fn constant(delay: f64) -> Result<TrafficPattern, RoutyError> {
        TrafficPattern::new(
            vec![PatternAnchor::new(0, delay)],
            vec![PatternAnchor::new(0, delay)],
        )
    }

    pub fn anchors(&self, day_type: DayType) -> &[PatternAnchor] {
        match day_type {
            DayType::Weekday => &self.weekday,
            DayType::Weekend => &self.weekend,
        }
    }

    /// baseline delay factor at a timestamp, in [0, 1].
    ///
    /// the day type comes from the timestamp's weekday. between two anchors the
    /// delay is interpolated linearly at minute resolution; before the first and
    /// after the last anchor the boundary value holds.
    pub fn baseline_delay(&self, timestamp: &NaiveDateTime) -> f64 {
        let anchors = self.anchors(DayType::of(timestamp));
        let hour = timestamp.hour() as f64 + timestamp.minute() as f64 / 60.0;
        let (first, last) = match (anchors.first(), anchors.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if hour <= first.hour as f64 {
            return first.delay;
        }
        if hour >= last.hour as f64 {
            return last.delay;
        }
        let delay = anchors
            .iter()
            .tuple_windows()
            .find(|(prev, next)| (prev.hour as f64) <= hour && hour < next.hour as f64)
            .map(|(prev, next)| {
                let t = (hour - prev.hour as f64) / (next.hour - prev.hour) as f64;
                prev.delay + t * (next.delay - prev.delay)
            })
            .unwrap_or(last.delay);
        delay.clamp(0.0, 1.0)
    }
}

impl TryFrom<&TrafficPatternConfig> for TrafficPattern {
    type Error = RoutyError;

    fn try_from(value: &TrafficPatternConfig) -> Result<Self, Self::Error> {
        TrafficPattern::new(value.weekday.clone(), value.weekend.clone())
    }
}

fn validate_anchors(
    day_type: DayType,
    anchors: Vec<PatternAnchor>,
) -> Result<Vec<PatternAnchor>, RoutyError> {
    if anchors.is_empty() {
        return Err(RoutyError::InvalidPattern(format!(
            "{day_type:?} pattern has no anchors"
        )));
    }
    if let Some(anchor) = anchors.iter().find(|a| a.hour > 23) {
        return Err(RoutyError::InvalidPattern(format!(
            "{day_type:?} anchor hour {} is outside [0, 23]",
            anchor.hour
        )));
    }
    if let Some(anchor) = anchors
        .iter()
        .find(|a| !(0.0..=1.0).contains(&a.delay))
    {
        return Err(RoutyError::InvalidPattern(format!(
            "{day_type:?} anchor delay {} at hour {} is outside [0, 1]",
            anchor.delay, anchor.hour
        )));
    }
    let sorted = anchors
        .into_iter()
        .sorted_by_key(|a| a.hour)
        .collect_vec();
    if let Some((a, _)) = sorted.iter().tuple_windows().find(|(a, b)| a.hour == b.hour) {
        return Err(RoutyError::InvalidPattern(format!(
            "{day_type:?} pattern defines hour {} more than once",
            a.hour
        )));
    }
    Ok(sorted)
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        // 2026-10-12 is a Monday, 2026-10-17 a Saturday
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn default_pattern() -> TrafficPattern {
        TrafficPattern::try_from(&TrafficPatternConfig::default()).unwrap()
    }

    #[test]
    fn test_day_type() {
        assert_eq!(DayType::of(&at(12, 8, 0)), DayType::Weekday);
        assert_eq!(DayType::of(&at(16, 8, 0)), DayType::Weekday);
        assert_eq!(DayType::of(&at(17, 8, 0)), DayType::Weekend);
        assert_eq!(DayType::of(&at(18, 8, 0)), DayType::Weekend);
    }

    #[test]
    fn test_anchor_hours_exact() {
        let pattern = default_pattern();
        assert!((pattern.baseline_delay(&at(12, 8, 0)) - 0.9).abs() < 1e-12);
        assert!((pattern.baseline_delay(&at(12, 10, 0)) - 0.2).abs() < 1e-12);
        assert!((pattern.baseline_delay(&at(17, 14, 0)) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_interpolates_between_anchors() {
        let pattern = default_pattern();
        // 10:00 -> 0.2, 12:00 -> 0.3
        assert!((pattern.baseline_delay(&at(12, 11, 0)) - 0.25).abs() < 1e-12);
        // 8:00 -> 0.9, 9:00 -> 0.6
        assert!((pattern.baseline_delay(&at(12, 8, 30)) - 0.75).abs() < 1e-12);
        // weekend 12:00 -> 0.3, 14:00 -> 0.4
        assert!((pattern.baseline_delay(&at(17, 13, 0)) - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_flat_outside_boundary_hours() {
        let pattern = default_pattern();
        assert!((pattern.baseline_delay(&at(12, 3, 0)) - 0.3).abs() < 1e-12);
        assert!((pattern.baseline_delay(&at(12, 23, 45)) - 0.1).abs() < 1e-12);
        assert!((pattern.baseline_delay(&at(18, 0, 5)) - 0.1).abs() < 1e-12);
        assert!((pattern.baseline_delay(&at(18, 21, 0)) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_unsorted_anchors_are_sorted() {
        let pattern = TrafficPattern::new(
            vec![PatternAnchor::new(12, 0.5), PatternAnchor::new(10, 0.1)],
            vec![PatternAnchor::new(0, 0.0)],
        )
        .unwrap();
        assert!((pattern.baseline_delay(&at(12, 11, 0)) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_patterns() {
        let ok = vec![PatternAnchor::new(0, 0.0)];
        let cases = [
            vec![],
            vec![PatternAnchor::new(24, 0.1)],
            vec![PatternAnchor::new(5, 1.5)],
            vec![PatternAnchor::new(5, f64::NAN)],
            vec![PatternAnchor::new(5, 0.1), PatternAnchor::new(5, 0.2)],
        ];
        for weekday in cases {
            let result = TrafficPattern::new(weekday, ok.clone());
            assert!(matches!(result, Err(RoutyError::InvalidPattern(_))));
        }
    }
}
