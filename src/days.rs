//! Calendar-day helpers
//!
//! Every date in the dashboard is a whole day at midnight UTC. Dataset keys and the
//! free-text date field use the `yyyy-mm-dd` form; full RFC 3339 timestamps are accepted
//! too and kept at their exact instant.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

/// A calendar day (or instant) in UTC
pub type Day = DateTime<Utc>;

/// Milliseconds in one whole day
pub const MS_PER_DAY: i64 = 86_400_000;

/// Error returned when a string is not a recognisable day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayParseError {
    input: String,
}

impl std::fmt::Display for DayParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid day: {:?}", self.input)
    }
}

impl std::error::Error for DayParseError {}

/// The Unix epoch (millisecond 0), used before any dataset has loaded
pub fn epoch() -> Day {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Parse `yyyy-mm-dd` or a full RFC 3339 timestamp
pub fn parse_day(s: &str) -> Result<Day, DayParseError> {
    let trimmed = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DayParseError {
            input: s.to_string(),
        })
}

/// Render a day as `yyyy-mm-dd`, dropping any time component
pub fn format_day(d: Day) -> String {
    let iso = d.to_rfc3339();
    iso.chars().take(10).collect()
}

/// Shift by `n` whole days (negative goes back)
///
/// Saturates at chrono's earliest or latest representable instant.
pub fn add_days(d: Day, n: i64) -> Day {
    n.checked_mul(MS_PER_DAY)
        .and_then(TimeDelta::try_milliseconds)
        .and_then(|delta| d.checked_add_signed(delta))
        .unwrap_or(if n < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

/// Midnight UTC of the day containing `d`
pub fn start_of_day(d: Day) -> Day {
    d.date_naive().and_time(NaiveTime::MIN).and_utc()
}

pub fn clamp_day(d: Day, min: Day, max: Day) -> Day {
    if d < min {
        min
    } else if d > max {
        max
    } else {
        d
    }
}

/// Whole days elapsed from `from` to `to` (negative when `to` is earlier)
pub fn days_between(from: Day, to: Day) -> i64 {
    (to - from).num_milliseconds() / MS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> Day {
        parse_day(s).unwrap()
    }

    #[test]
    fn test_parse_plain_day() {
        let d = day("2020-04-10");
        assert_eq!(d.timestamp_millis(), 1_586_476_800_000);
    }

    #[test]
    fn test_parse_rfc3339() {
        let d = day("2020-04-10T12:30:00Z");
        assert_eq!(format_day(d), "2020-04-10");
        assert_eq!(d, add_days(day("2020-04-10"), 0) + TimeDelta::minutes(750));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_day("").is_err());
        assert!(parse_day("yesterday").is_err());
        assert!(parse_day("2020-13-01").is_err());
        assert!(parse_day("2020-02-30").is_err());

        let err = parse_day("nope").unwrap_err();
        assert_eq!(err.to_string(), "invalid day: \"nope\"");
    }

    #[test]
    fn test_format_round_trip() {
        // Day-aligned dates lose nothing through format/parse
        for s in ["1970-01-01", "2020-02-29", "2020-04-05", "2021-12-31"] {
            let d = day(s);
            assert_eq!(format_day(d), s);
            assert_eq!(parse_day(&format_day(d)).unwrap(), d);
        }
    }

    #[test]
    fn test_add_days_crosses_month_and_goes_back() {
        assert_eq!(add_days(day("2020-03-30"), 3), day("2020-04-02"));
        assert_eq!(add_days(day("2020-04-10"), -7), day("2020-04-03"));
        assert_eq!(add_days(day("2020-04-10"), 0), day("2020-04-10"));
    }

    #[test]
    fn test_add_days_saturates_out_of_range() {
        let d = day("2020-04-05");

        assert_eq!(add_days(d, 100_000_000), DateTime::<Utc>::MAX_UTC);
        assert_eq!(add_days(d, -100_000_000), DateTime::<Utc>::MIN_UTC);
        assert_eq!(add_days(d, i64::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(add_days(d, i64::MIN), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_start_of_day() {
        assert_eq!(start_of_day(day("2020-04-03T12:00:00Z")), day("2020-04-03"));
        assert_eq!(start_of_day(day("2020-04-03T23:59:59+00:00")), day("2020-04-03"));
        assert_eq!(start_of_day(day("2020-04-03")), day("2020-04-03"));
    }

    #[test]
    fn test_clamp_day() {
        let min = day("2020-04-01");
        let max = day("2020-04-05");

        assert_eq!(clamp_day(day("2020-03-01"), min, max), min);
        assert_eq!(clamp_day(day("2020-05-01"), min, max), max);
        assert_eq!(clamp_day(day("2020-04-03"), min, max), day("2020-04-03"));
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let min = day("2020-04-01");
        let max = day("2020-04-05");

        for offset in -10..10 {
            let d = add_days(min, offset);
            let once = clamp_day(d, min, max);
            assert_eq!(clamp_day(once, min, max), once);
        }
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(day("2020-04-01"), day("2020-04-05")), 4);
        assert_eq!(days_between(day("2020-04-05"), day("2020-04-01")), -4);
        assert_eq!(days_between(epoch(), epoch()), 0);
    }
}
