//! Calendar-aware breakdown of a millisecond duration into display units.
//!
//! The base breakdown divides by fixed unit lengths, treating every year as
//! 365 days. Leap days spanned by the countdown are then folded back in by
//! walking the calendar years between "now" and the target.
//!
//! The February check compares the month of the current clock reading with
//! the month of the target. It does not track every February the countdown
//! actually crosses, so countdowns spanning several years that start and end
//! outside January/February can miss the leap day of the final year.
//!
//! # Examples
//!
//! ```rust
//! use bubbletea_countdown::decompose::decompose_in;
//! use chrono::Utc;
//!
//! let now = 1_700_000_000_000;
//! let target = now + 90_000;
//! let units = decompose_in(&Utc, target - now, target, now);
//! assert_eq!((units.minutes, units.seconds), (1, 30));
//! ```

use chrono::{Datelike, Local, TimeZone};

use crate::units::{
    UnitTuple, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND, MS_PER_WEEK, MS_PER_YEAR,
};

/// Gregorian leap-year rule.
///
/// ```rust
/// use bubbletea_countdown::decompose::is_leap_year;
///
/// assert!(is_leap_year(2024));
/// assert!(is_leap_year(2000));
/// assert!(!is_leap_year(1900));
/// assert!(!is_leap_year(2023));
/// ```
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Decomposes `duration_ms` using the host's local calendar.
///
/// `target_ms` and `now_ms` are epoch milliseconds; they only feed the
/// leap-day correction. The sign of `duration_ms` is discarded from the
/// result and selects the direction of the February check.
pub fn decompose(duration_ms: i64, target_ms: i64, now_ms: i64) -> UnitTuple {
    decompose_in(&Local, duration_ms, target_ms, now_ms)
}

/// Decomposes `duration_ms`, reading calendar years and months in `tz`.
pub fn decompose_in<Tz: TimeZone>(
    tz: &Tz,
    duration_ms: i64,
    target_ms: i64,
    now_ms: i64,
) -> UnitTuple {
    if duration_ms == 0 {
        return UnitTuple::ZERO;
    }

    let is_negative = duration_ms < 0;
    let mut units = base_units(duration_ms.unsigned_abs());

    let (Some(now), Some(target)) = (calendar_point(tz, now_ms), calendar_point(tz, target_ms))
    else {
        return units;
    };

    let spans_february = if is_negative {
        target.month0 <= 1 && now.month0 > 1
    } else {
        now.month0 <= 1 && target.month0 > 1
    };

    if units.years == 0 && !spans_february {
        return units;
    }

    let first = now.year.min(target.year);
    let last = now.year.max(target.year);
    for year in first..=last {
        let intermediate = year > first && year < last;
        if is_leap_year(year) && (intermediate || spans_february) {
            units.add_leap_day();
        }
    }

    units
}

/// Fixed-length breakdown, each unit taken from the remainder of the one above.
fn base_units(abs_ms: u64) -> UnitTuple {
    let years = abs_ms / MS_PER_YEAR;
    let rest = abs_ms % MS_PER_YEAR;
    let weeks = rest / MS_PER_WEEK;
    let rest = rest % MS_PER_WEEK;
    let days = rest / MS_PER_DAY;
    let rest = rest % MS_PER_DAY;
    let hours = rest / MS_PER_HOUR;
    let rest = rest % MS_PER_HOUR;
    let minutes = rest / MS_PER_MINUTE;
    let seconds = (rest % MS_PER_MINUTE) / MS_PER_SECOND;

    UnitTuple {
        years,
        weeks,
        days,
        hours,
        minutes,
        seconds,
    }
}

#[derive(Debug, Clone, Copy)]
struct CalendarPoint {
    year: i32,
    // January = 0
    month0: u32,
}

fn calendar_point<Tz: TimeZone>(tz: &Tz, epoch_ms: i64) -> Option<CalendarPoint> {
    let moment = tz.timestamp_millis_opt(epoch_ms).earliest()?;
    Some(CalendarPoint {
        year: moment.year(),
        month0: moment.month0(),
    })
}
