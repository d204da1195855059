//! Calendar-day handling for catalog temporal filters.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const LAST_SECOND_OF_DAY: i64 = 23 * 3600 + 59 * 60 + 59;

/// A calendar day, independent of any time-of-day the caller supplied.
///
/// Converting a timestamp keeps the calendar date in the timestamp's own
/// offset, so `2021-01-01T23:00:00-05:00` is the day `2021-01-01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from year, month, day. Returns `None` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// 00:00:00 UTC of this day.
    pub fn earliest(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.0.and_time(NaiveTime::MIN))
    }

    /// 23:59:59 UTC of this day.
    pub fn latest(&self) -> DateTime<Utc> {
        self.earliest() + Duration::seconds(LAST_SECOND_OF_DAY)
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<NaiveDateTime> for CalendarDay {
    fn from(dt: NaiveDateTime) -> Self {
        Self(dt.date())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for CalendarDay {
    fn from(dt: DateTime<Tz>) -> Self {
        Self(dt.date_naive())
    }
}

impl FromStr for CalendarDay {
    type Err = TimeParseError;

    /// Parse a date or timestamp string.
    ///
    /// Supports:
    /// - Date only: "2024-01-15"
    /// - RFC 3339: "2024-01-15T12:00:00Z", "2024-01-15T12:00:00+02:00"
    /// - Naive timestamps: "2024-01-15T12:00:00", "2024-01-15 12:00:00"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self(date));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.into());
        }

        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(ndt.into());
            }
        }

        Err(TimeParseError::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// An inclusive UTC time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window from the first second of `first` to the last second of `last`.
    pub fn whole_days(first: CalendarDay, last: CalendarDay) -> Self {
        Self {
            start: first.earliest(),
            end: last.latest(),
        }
    }

    pub fn contains(&self, dt: &DateTime<Utc>) -> bool {
        dt >= &self.start && dt <= &self.end
    }

    /// Check the window is not inverted.
    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_date_only() {
        let day: CalendarDay = "2021-01-01".parse().unwrap();
        assert_eq!(day, CalendarDay::from_ymd(2021, 1, 1).unwrap());
    }

    #[test]
    fn test_parse_drops_time_of_day() {
        let day: CalendarDay = "2024-01-15T12:34:56Z".parse().unwrap();
        assert_eq!(day.to_string(), "2024-01-15");

        let day: CalendarDay = "2024-01-15 23:59:00".parse().unwrap();
        assert_eq!(day.to_string(), "2024-01-15");
    }

    #[test]
    fn test_parse_keeps_local_calendar_date() {
        let day: CalendarDay = "2021-01-01T23:00:00-05:00".parse().unwrap();
        assert_eq!(day.to_string(), "2021-01-01");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("yesterday".parse::<CalendarDay>().is_err());
        assert!("2021-02-30".parse::<CalendarDay>().is_err());
    }

    #[test]
    fn test_earliest_and_latest() {
        let day = CalendarDay::from_ymd(2020, 5, 2).unwrap();
        let start = day.earliest();
        let end = day.latest();
        assert_eq!((start.year(), start.month(), start.day()), (2020, 5, 2));
        assert_eq!((start.hour(), start.minute(), start.second()), (0, 0, 0));
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
        assert_eq!(end.to_rfc3339(), "2020-05-02T23:59:59+00:00");
    }

    #[test]
    fn test_whole_days_single_day() {
        let day = CalendarDay::from_ymd(2021, 1, 1).unwrap();
        let range = TimeRange::whole_days(day, day);
        assert!(range.is_ordered());
        assert!(range.contains(&Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap()));
        assert!(!range.contains(&Utc.with_ymd_and_hms(2021, 1, 2, 0, 0, 0).unwrap()));
    }
}
