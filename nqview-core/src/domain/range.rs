//! Query windows for vendor requests.

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A closed-open query window `[start, end)` of UTC instants.
///
/// Construction enforces `start <= end`; every fetch operation takes one of
/// these, so an inverted window never reaches the vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("start {start} is after end {end}")]
    Inverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window between two calendar dates, both taken at midnight UTC.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        Self::new(midnight_utc(start), midnight_utc(end))
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// ISO-8601 start, as accepted by time-series queries.
    pub fn start_iso(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// ISO-8601 end, as accepted by time-series queries.
    pub fn end_iso(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Calendar date of the start; reference queries discard time-of-day.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_iso(), self.end_iso())
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[derive(Deserialize)]
struct RawRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawRange> for TimeRange {
    type Error = RangeError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn rejects_inverted_window() {
        let err = TimeRange::new(utc(2025, 3, 22, 0, 0), utc(2025, 3, 21, 0, 0)).unwrap_err();
        assert!(matches!(err, RangeError::Inverted { .. }));
    }

    #[test]
    fn accepts_empty_window() {
        let t = utc(2025, 3, 21, 9, 30);
        let range = TimeRange::new(t, t).unwrap();
        assert_eq!(range.start(), range.end());
    }

    #[test]
    fn iso_rendering_uses_utc_suffix() {
        let range = TimeRange::new(utc(2025, 3, 21, 0, 0), utc(2025, 3, 22, 0, 0)).unwrap();
        assert_eq!(range.start_iso(), "2025-03-21T00:00:00Z");
        assert_eq!(range.end_iso(), "2025-03-22T00:00:00Z");
    }

    #[test]
    fn dates_drop_time_of_day() {
        let range = TimeRange::new(utc(2025, 3, 21, 13, 45), utc(2025, 3, 22, 23, 59)).unwrap();
        assert_eq!(range.start_date(), NaiveDate::from_ymd_opt(2025, 3, 21).unwrap());
        assert_eq!(range.end_date(), NaiveDate::from_ymd_opt(2025, 3, 22).unwrap());
    }

    #[test]
    fn from_dates_uses_midnight() {
        let range = TimeRange::from_dates(
            NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 21).unwrap(),
        )
        .unwrap();
        assert_eq!(range.start(), utc(2025, 3, 20, 0, 0));
        assert_eq!(range.end(), utc(2025, 3, 21, 0, 0));
    }

    #[test]
    fn deserialize_validates_order() {
        let ok: TimeRange = toml::from_str(
            "start = \"2025-03-21T00:00:00Z\"\nend = \"2025-03-22T00:00:00Z\"",
        )
        .unwrap();
        assert_eq!(ok.start(), utc(2025, 3, 21, 0, 0));

        let bad = toml::from_str::<TimeRange>(
            "start = \"2025-03-23T00:00:00Z\"\nend = \"2025-03-22T00:00:00Z\"",
        );
        assert!(bad.is_err());
    }
}
