//! Screen-reader hints derived from each tick.
//!
//! A countdown that announces every second is noisy, so only the most
//! significant nonzero unit is marked [`Visibility::Active`] and announcements
//! are throttled to minute boundaries unless that unit is seconds. The widget
//! itself does not act on these hints; it hands them to whoever renders it.
//!
//! # Examples
//!
//! ```rust
//! use bubbletea_countdown::accessibility::{AccessibilityHint, Announcement, LiveMode, Visibility};
//! use bubbletea_countdown::units::{Unit, UnitTuple};
//!
//! let hint = AccessibilityHint::for_units(&UnitTuple::from([0, 0, 3, 0, 0, 45]));
//! assert_eq!(hint.active, Some(Unit::Days));
//! assert_eq!(hint.visibility(Unit::Days), Visibility::Active);
//! assert_eq!(hint.visibility(Unit::Seconds), Visibility::Suppressed);
//! assert_eq!(hint.announcement, Announcement::MinuteBoundary);
//! assert_eq!(hint.live, LiveMode::Off);
//! ```

use crate::units::{Unit, UnitTuple};

/// Whether a unit is the one assistive technology should focus on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// The most significant nonzero unit.
    Active,
    /// Every other unit.
    Suppressed,
}

/// How often the widget should be announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Announcement {
    /// Every tick. Used when seconds are the most significant unit left.
    Continuous,
    /// Only on ticks where seconds read zero.
    MinuteBoundary,
}

/// Live-region politeness for the current tick, i.e. `aria-live`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LiveMode {
    /// Do not announce this update.
    #[default]
    Off,
    /// Announce this update when the reader is idle.
    Polite,
}

impl LiveMode {
    /// The attribute value, `"off"` or `"polite"`.
    pub fn as_str(self) -> &'static str {
        match self {
            LiveMode::Off => "off",
            LiveMode::Polite => "polite",
        }
    }
}

/// Accessibility state for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessibilityHint {
    /// The most significant nonzero unit, `None` once everything reads zero.
    pub active: Option<Unit>,
    /// Per-unit tag, indexed by [`Unit::index`].
    pub visibility: [Visibility; 6],
    /// Announcement cadence implied by the active unit.
    pub announcement: Announcement,
    /// Whether this particular tick should be announced.
    pub live: LiveMode,
}

impl AccessibilityHint {
    /// Derives the hint for `units`.
    ///
    /// An all-zero tuple has no active unit and is announced continuously,
    /// so the final "zero" reading is not swallowed.
    pub fn for_units(units: &UnitTuple) -> Self {
        Self::for_active(units.highest_nonzero(), units.seconds)
    }

    /// Derives the hint when the active unit has already been chosen,
    /// e.g. after skipping units hidden by configuration.
    pub fn for_active(active: Option<Unit>, seconds: u64) -> Self {
        let mut visibility = [Visibility::Suppressed; 6];
        if let Some(unit) = active {
            visibility[unit.index()] = Visibility::Active;
        }

        let announcement = match active {
            Some(Unit::Seconds) | None => Announcement::Continuous,
            Some(_) => Announcement::MinuteBoundary,
        };

        let live = match announcement {
            Announcement::Continuous => LiveMode::Polite,
            Announcement::MinuteBoundary if seconds == 0 => LiveMode::Polite,
            Announcement::MinuteBoundary => LiveMode::Off,
        };

        Self {
            active,
            visibility,
            announcement,
            live,
        }
    }

    /// The tag for `unit`.
    pub fn visibility(&self, unit: Unit) -> Visibility {
        self.visibility[unit.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_highest_unit_is_active() {
        let hint = AccessibilityHint::for_units(&UnitTuple::from([0, 2, 3, 4, 5, 6]));
        assert_eq!(hint.active, Some(Unit::Weeks));
        for unit in Unit::ALL {
            let expected = if unit == Unit::Weeks {
                Visibility::Active
            } else {
                Visibility::Suppressed
            };
            assert_eq!(hint.visibility(unit), expected, "unit {}", unit);
        }
    }

    #[test]
    fn test_seconds_active_announces_continuously() {
        let hint = AccessibilityHint::for_units(&UnitTuple::from([0, 0, 0, 0, 0, 42]));
        assert_eq!(hint.active, Some(Unit::Seconds));
        assert_eq!(hint.announcement, Announcement::Continuous);
        assert_eq!(hint.live, LiveMode::Polite);
    }

    #[test]
    fn test_minute_boundary_announcement() {
        let on_boundary = AccessibilityHint::for_units(&UnitTuple::from([0, 0, 0, 1, 5, 0]));
        assert_eq!(on_boundary.announcement, Announcement::MinuteBoundary);
        assert_eq!(on_boundary.live, LiveMode::Polite);

        let between = AccessibilityHint::for_units(&UnitTuple::from([0, 0, 0, 1, 5, 1]));
        assert_eq!(between.announcement, Announcement::MinuteBoundary);
        assert_eq!(between.live, LiveMode::Off);
    }

    #[test]
    fn test_all_zero_has_no_active_unit() {
        let hint = AccessibilityHint::for_units(&UnitTuple::ZERO);
        assert_eq!(hint.active, None);
        assert!(hint
            .visibility
            .iter()
            .all(|visibility| *visibility == Visibility::Suppressed));
        assert_eq!(hint.live, LiveMode::Polite);
    }

    #[test]
    fn test_live_mode_strings() {
        assert_eq!(LiveMode::Off.as_str(), "off");
        assert_eq!(LiveMode::Polite.as_str(), "polite");
        assert_eq!(LiveMode::default(), LiveMode::Off);
    }
}
