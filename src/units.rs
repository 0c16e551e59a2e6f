//! Time units and the six-slot unit tuple.
//!
//! A countdown is displayed as a breakdown into years, weeks, days, hours,
//! minutes and seconds. [`UnitTuple`] holds one such breakdown and [`Unit`]
//! names its slots, ordered from most to least significant.
//!
//! # Examples
//!
//! ```rust
//! use bubbletea_countdown::units::{Unit, UnitTuple};
//!
//! let units = UnitTuple::from([0, 0, 3, 0, 0, 45]);
//! assert_eq!(units.highest_nonzero(), Some(Unit::Days));
//! assert_eq!(units.formatted(true)[5], "45");
//! assert_eq!(units.formatted(true)[2], "03");
//! ```

use std::fmt;

/// Milliseconds in one second.
pub const MS_PER_SECOND: u64 = 1_000;
/// Milliseconds in one minute.
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
/// Milliseconds in one hour.
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
/// Milliseconds in one day.
pub const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;
/// Milliseconds in one week.
pub const MS_PER_WEEK: u64 = 7 * MS_PER_DAY;
/// Milliseconds in a 365-day year. Leap days are folded back in by the decomposer.
pub const MS_PER_YEAR: u64 = 365 * MS_PER_DAY;

/// One slot of a [`UnitTuple`], most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Unit {
    /// 365-day years.
    Years,
    /// Seven-day weeks.
    Weeks,
    /// Days.
    Days,
    /// Hours.
    Hours,
    /// Minutes.
    Minutes,
    /// Seconds.
    Seconds,
}

impl Unit {
    /// All units in display order.
    pub const ALL: [Unit; 6] = [
        Unit::Years,
        Unit::Weeks,
        Unit::Days,
        Unit::Hours,
        Unit::Minutes,
        Unit::Seconds,
    ];

    /// Position of this unit in a [`UnitTuple`] (years = 0, seconds = 5).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Unit::index`].
    pub fn from_index(index: usize) -> Option<Unit> {
        Unit::ALL.get(index).copied()
    }

    /// Lowercase singular English name, e.g. `"day"`.
    pub fn singular_name(self) -> &'static str {
        match self {
            Unit::Years => "year",
            Unit::Weeks => "week",
            Unit::Days => "day",
            Unit::Hours => "hour",
            Unit::Minutes => "minute",
            Unit::Seconds => "second",
        }
    }

    /// Lowercase plural English name, e.g. `"days"`.
    pub fn plural_name(self) -> &'static str {
        match self {
            Unit::Years => "years",
            Unit::Weeks => "weeks",
            Unit::Days => "days",
            Unit::Hours => "hours",
            Unit::Minutes => "minutes",
            Unit::Seconds => "seconds",
        }
    }

    /// Length of one unit in milliseconds.
    pub fn millis(self) -> u64 {
        match self {
            Unit::Years => MS_PER_YEAR,
            Unit::Weeks => MS_PER_WEEK,
            Unit::Days => MS_PER_DAY,
            Unit::Hours => MS_PER_HOUR,
            Unit::Minutes => MS_PER_MINUTE,
            Unit::Seconds => MS_PER_SECOND,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural_name())
    }
}

/// A duration broken down into `[years, weeks, days, hours, minutes, seconds]`.
///
/// Values are always non-negative; the sign of the duration travels separately
/// (see [`crate::scheduler::TickEvent::is_negative`]).
///
/// Apart from `years`, each value normally stays inside its natural range
/// (weeks below 52, days below 7, hours below 24, minutes and seconds below 60).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UnitTuple {
    /// Whole years.
    pub years: u64,
    /// Whole weeks left over after the years.
    pub weeks: u64,
    /// Whole days left over after the weeks.
    pub days: u64,
    /// Whole hours left over after the days.
    pub hours: u64,
    /// Whole minutes left over after the hours.
    pub minutes: u64,
    /// Whole seconds left over after the minutes.
    pub seconds: u64,
}

impl UnitTuple {
    /// The all-zero tuple.
    pub const ZERO: UnitTuple = UnitTuple {
        years: 0,
        weeks: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Returns the value stored for `unit`.
    pub fn get(&self, unit: Unit) -> u64 {
        match unit {
            Unit::Years => self.years,
            Unit::Weeks => self.weeks,
            Unit::Days => self.days,
            Unit::Hours => self.hours,
            Unit::Minutes => self.minutes,
            Unit::Seconds => self.seconds,
        }
    }

    /// The values in display order.
    pub fn to_array(&self) -> [u64; 6] {
        [
            self.years,
            self.weeks,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
        ]
    }

    /// Returns `true` when every slot is zero.
    pub fn is_zero(&self) -> bool {
        *self == UnitTuple::ZERO
    }

    /// Multiplies each slot back by its unit length and sums the result.
    ///
    /// For durations without a leap-day adjustment this reproduces the
    /// whole-second part of the duration that was decomposed.
    pub fn total_millis(&self) -> u64 {
        Unit::ALL
            .iter()
            .map(|unit| self.get(*unit).saturating_mul(unit.millis()))
            .fold(0u64, u64::saturating_add)
    }

    /// Total number of days represented by years, weeks and days, counting
    /// a year as 365 days.
    pub fn total_days(&self) -> u64 {
        self.years * 365 + self.weeks * 7 + self.days
    }

    /// The most significant unit whose value is nonzero, or `None` when the
    /// tuple is all zero.
    pub fn highest_nonzero(&self) -> Option<Unit> {
        Unit::ALL.into_iter().find(|unit| self.get(*unit) > 0)
    }

    /// Like [`UnitTuple::highest_nonzero`] but only considers units for which
    /// `allowed` returns `true`.
    pub fn highest_nonzero_where(&self, allowed: impl Fn(Unit) -> bool) -> Option<Unit> {
        Unit::ALL
            .into_iter()
            .find(|unit| allowed(*unit) && self.get(*unit) > 0)
    }

    /// Adds one day and carries the overflow into weeks and years.
    ///
    /// Seven days roll into a week, 52 weeks roll into a year.
    pub fn add_leap_day(&mut self) {
        self.days += 1;
        if self.days >= 7 {
            self.days = 0;
            self.weeks += 1;
        }
        if self.weeks >= 52 {
            self.weeks = 0;
            self.years += 1;
        }
    }

    /// Formats every slot with [`format_value`].
    pub fn formatted(&self, pad: bool) -> [String; 6] {
        self.to_array().map(|value| format_value(value, pad))
    }
}

impl From<[u64; 6]> for UnitTuple {
    fn from(values: [u64; 6]) -> Self {
        let [years, weeks, days, hours, minutes, seconds] = values;
        UnitTuple {
            years,
            weeks,
            days,
            hours,
            minutes,
            seconds,
        }
    }
}

impl From<UnitTuple> for [u64; 6] {
    fn from(units: UnitTuple) -> Self {
        units.to_array()
    }
}

/// Zero-pads values below ten to two digits.
///
/// ```rust
/// use bubbletea_countdown::units::pad;
///
/// assert_eq!(pad(5), "05");
/// assert_eq!(pad(42), "42");
/// assert_eq!(pad(365), "365");
/// ```
pub fn pad(value: u64) -> String {
    format!("{:02}", value)
}

/// Formats a unit value, padded to two digits when `pad_values` is set.
pub fn format_value(value: u64, pad_values: bool) -> String {
    if pad_values {
        pad(value)
    } else {
        value.to_string()
    }
}
