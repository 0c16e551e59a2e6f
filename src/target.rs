//! The instant a countdown runs towards.
//!
//! A [`TargetMoment`] is an immutable epoch-millisecond timestamp fixed when
//! a widget is created. It is usually parsed from a date string supplied by
//! the host application:
//!
//! - RFC 3339 with an offset, e.g. `2030-01-01T00:00:00Z` or
//!   `2030-01-01T09:30:00+02:00`
//! - a bare date, `2030-01-01`, read as midnight UTC
//! - a date and time without offset, `2030-01-01T09:30`, `2030-01-01T09:30:15`
//!   or `2030-01-01 09:30:15.250`, read in the local time zone
//!
//! # Examples
//!
//! ```rust
//! use bubbletea_countdown::target::TargetMoment;
//!
//! let target: TargetMoment = "2030-01-01T00:00:00Z".parse().unwrap();
//! assert_eq!(target.epoch_millis(), 1_893_456_000_000);
//!
//! // Unparseable input logs a warning and falls back to the current time.
//! let fallback = TargetMoment::parse_or_now("not a date");
//! assert!(fallback <= TargetMoment::now());
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::TargetError;

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// An instant in time, in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetMoment(i64);

impl TargetMoment {
    /// Wraps an epoch-millisecond timestamp.
    pub fn from_epoch_millis(epoch_ms: i64) -> Self {
        TargetMoment(epoch_ms)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        TargetMoment(Utc::now().timestamp_millis())
    }

    /// The current time shifted forward by `delay`.
    pub fn after(delay: Duration) -> Self {
        Self::now().offset_by(duration_millis(delay))
    }

    /// The current time shifted back by `elapsed`.
    pub fn before(elapsed: Duration) -> Self {
        Self::now().offset_by(-duration_millis(elapsed))
    }

    /// Epoch milliseconds.
    pub fn epoch_millis(self) -> i64 {
        self.0
    }

    /// Returns a moment `delta_ms` milliseconds later (or earlier when negative).
    pub fn offset_by(self, delta_ms: i64) -> Self {
        TargetMoment(self.0.saturating_add(delta_ms))
    }

    /// Parses a date string in one of the formats listed in the module docs.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Empty`] for blank input,
    /// [`TargetError::NonexistentLocalTime`] for a local time skipped by a
    /// time-zone transition and [`TargetError::Invalid`] for anything else
    /// that cannot be read.
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TargetError::Empty);
        }

        if let Ok(moment) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(moment.into());
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            let midnight = date.and_time(NaiveTime::MIN);
            return Ok(Utc.from_utc_datetime(&midnight).into());
        }

        let naive = LOCAL_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .ok_or_else(|| TargetError::Invalid {
                input: trimmed.to_string(),
            })?;

        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(TargetMoment::from)
            .ok_or_else(|| TargetError::NonexistentLocalTime {
                input: trimmed.to_string(),
            })
    }

    /// Parses `input`, substituting the current time when it cannot be read.
    ///
    /// The countdown then starts at zero. The failure is logged as a warning.
    pub fn parse_or_now(input: &str) -> Self {
        match Self::parse(input) {
            Ok(target) => target,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "countdown target needs a valid date string; counting down to now instead"
                );
                Self::now()
            }
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for TargetMoment {
    fn from(moment: DateTime<Tz>) -> Self {
        TargetMoment(moment.timestamp_millis())
    }
}

impl FromStr for TargetMoment {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetMoment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Utc.timestamp_millis_opt(self.0).single() {
            Some(moment) => write!(f, "{}", moment.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}

fn duration_millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
