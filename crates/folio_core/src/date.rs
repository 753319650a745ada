//! Publish dates from front matter.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// Accepted layouts for dates without an explicit offset (read as UTC).
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Accepted layouts carrying a numeric offset, e.g. `2025-01-12 10:00:00 +0800`.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M %z"];

/// Publication date of a document, normalized to a UTC instant.
///
/// Date-only values keep that shape when printed, so `2025-01-12` in front
/// matter comes back out as `2025-01-12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublishDate {
    instant: DateTime<Utc>,
    date_only: bool,
}

impl PublishDate {
    /// Midnight UTC on the given day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self::from_naive_date(date))
    }

    fn from_naive_date(date: NaiveDate) -> Self {
        Self {
            instant: date.and_time(chrono::NaiveTime::MIN).and_utc(),
            date_only: true,
        }
    }

    /// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]` (with optional `±HHMM`
    /// offset) or RFC 3339.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(Self::from_naive_date(date));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self {
                instant: dt.with_timezone(&Utc),
                date_only: false,
            });
        }

        let with_offset = OFFSET_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
            .map(|dt| dt.with_timezone(&Utc));
        let instant = with_offset.or_else(|| {
            NAIVE_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.and_utc())
        })?;

        Some(Self {
            instant,
            date_only: false,
        })
    }

    /// The UTC instant used for ordering.
    pub const fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub const fn is_date_only(&self) -> bool {
        self.date_only
    }
}

impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.date_only {
            write!(f, "{}", self.instant.format("%Y-%m-%d"))
        } else {
            f.write_str(&self.instant.to_rfc3339_opts(SecondsFormat::Secs, true))
        }
    }
}

impl Serialize for PublishDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
