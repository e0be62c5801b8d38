use crate::model::RoutyError;
use chrono::{DateTime, Duration, NaiveDateTime};

/// accepted layouts for departure times without an offset
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// parses a departure time. RFC 3339 input keeps its local wall-clock time,
/// since the traffic pattern is keyed on the local hour of day.
pub fn parse_departure(value: &str) -> Result<NaiveDateTime, RoutyError> {
    let trimmed = value.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| RoutyError::InvalidDeparture(value.to_string()))
}

/// `time` moved forward by whole hours, or `None` past the calendar range.
pub fn hours_after(time: &NaiveDateTime, hours: i64) -> Option<NaiveDateTime> {
    Duration::try_hours(hours).and_then(|offset| time.checked_add_signed(offset))
}

/// `time` moved forward by a duration in minutes, rounded to the millisecond.
pub fn minutes_after(time: &NaiveDateTime, minutes: f64) -> Result<NaiveDateTime, RoutyError> {
    let millis = (minutes * 60_000.0).round();
    let offset = if millis.is_finite() && millis.abs() < i64::MAX as f64 {
        Duration::try_milliseconds(millis as i64)
    } else {
        None
    };
    offset
        .and_then(|offset| time.checked_add_signed(offset))
        .ok_or_else(|| RoutyError::TimeOutOfRange(format!("{time} + {minutes} minutes")))
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn expected() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 12)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_formats() {
        for value in [
            "2026-10-12T08:30:00",
            "2026-10-12T08:30:00.000",
            "2026-10-12 08:30:00",
            "2026-10-12T08:30",
            "2026-10-12 08:30",
            " 2026-10-12T08:30:00+02:00 ",
            "2026-10-12T08:30:00Z",
        ] {
            assert_eq!(parse_departure(value).unwrap(), expected(), "{value}");
        }
    }

    #[test]
    fn test_parse_failure() {
        for value in ["", "tomorrow", "2026-13-01T08:00", "08:30"] {
            assert!(matches!(
                parse_departure(value),
                Err(RoutyError::InvalidDeparture(_))
            ));
        }
    }

    #[test]
    fn test_offsets_within_range() {
        assert_eq!(
            hours_after(&expected(), 3),
            Some(expected() + Duration::hours(3))
        );
        assert_eq!(
            minutes_after(&expected(), 90.5).unwrap(),
            expected() + Duration::seconds(5430)
        );
    }

    #[test]
    fn test_offsets_past_calendar_range() {
        assert_eq!(hours_after(&NaiveDateTime::MAX, 1), None);
        assert_eq!(hours_after(&expected(), i64::MAX), None);
        for minutes in [1e12, 1e300, f64::INFINITY, f64::NAN] {
            assert!(matches!(
                minutes_after(&expected(), minutes),
                Err(RoutyError::TimeOutOfRange(_))
            ));
        }
    }
}
