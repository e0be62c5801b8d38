use super::{departure_ops, LiveReading, Prediction, TravelTimePredictor};
use chrono::NaiveDateTime;

/// lazily evaluated predictions, one per consecutive hour from `now`. the base
/// travel time is fixed when the forecast is built and the live signal on the
/// first near-term hour; every call to [`HourlyForecast::iter`] starts over
/// from the first hour.
pub struct HourlyForecast<'a> {
    predictor: &'a TravelTimePredictor,
    start: String,
    end: String,
    base_time_minutes: f64,
    now: NaiveDateTime,
    hours: usize,
    live: LiveReading,
}

impl<'a> HourlyForecast<'a> {
    pub(crate) fn new(
        predictor: &'a TravelTimePredictor,
        start: &str,
        end: &str,
        base_time_minutes: f64,
        now: NaiveDateTime,
        hours: usize,
    ) -> HourlyForecast<'a> {
        HourlyForecast {
            predictor,
            start: start.to_string(),
            end: end.to_string(),
            base_time_minutes,
            now,
            hours,
            live: LiveReading::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.hours
    }

    pub fn is_empty(&self) -> bool {
        self.hours == 0
    }

    pub fn iter(&self) -> HourlyForecastIter<'_, 'a> {
        HourlyForecastIter {
            forecast: self,
            next_hour: 0,
        }
    }
}

pub struct HourlyForecastIter<'f, 'a> {
    forecast: &'f HourlyForecast<'a>,
    next_hour: usize,
}

impl Iterator for HourlyForecastIter<'_, '_> {
    type Item = Prediction;

    fn next(&mut self) -> Option<Self::Item> {
        let f = self.forecast;
        if self.next_hour >= f.hours {
            return None;
        }
        let offset = i64::try_from(self.next_hour).ok()?;
        let departure = departure_ops::hours_after(&f.now, offset)?;
        self.next_hour += 1;
        let prediction = f.predictor.predict_with_base(
            &f.start,
            &f.end,
            f.base_time_minutes,
            &departure,
            &f.now,
            &f.live,
        );
        Some(prediction)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.forecast.hours.saturating_sub(self.next_hour);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HourlyForecastIter<'_, '_> {}

impl<'f, 'a> IntoIterator for &'f HourlyForecast<'a> {
    type Item = Prediction;
    type IntoIter = HourlyForecastIter<'f, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
