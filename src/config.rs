//! Widget configuration.
//!
//! [`TimerConfig`] is fixed when a countdown is created. It decides which
//! units are shown, how they are labelled, whether values are zero-padded,
//! whether compact mode is on and whether the countdown keeps counting up
//! once the target has passed.
//!
//! # Examples
//!
//! ```rust
//! use bubbletea_countdown::config::{TimerConfig, UnitConfig};
//! use bubbletea_countdown::units::Unit;
//!
//! let config = TimerConfig::default()
//!     .with_allow_negative(true)
//!     .with_compact(true)
//!     .with_unit_allowed(Unit::Years, false)
//!     .with_unit(Unit::Days, UnitConfig::new("jour", "jours"));
//!
//! assert!(!config.unit(Unit::Years).allowed);
//! assert_eq!(config.label(Unit::Days, 2), "jours");
//! ```
//!
//! The configuration also deserializes from any serde format. Missing
//! fields keep their defaults:
//!
//! ```rust
//! use bubbletea_countdown::config::TimerConfig;
//!
//! let config: TimerConfig = toml::from_str(r#"
//!     compact = true
//!
//!     [weeks]
//!     allowed = false
//! "#).unwrap();
//!
//! assert!(config.compact);
//! assert!(!config.weeks.allowed);
//! assert!(config.pad_values);
//! ```

use serde::{Deserialize, Serialize};

use crate::units::Unit;

/// Display settings for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    /// Whether the unit is rendered at all.
    pub allowed: bool,
    /// Label used when the value is exactly 1.
    pub singular: String,
    /// Label used for every other value.
    pub plural: String,
}

impl UnitConfig {
    /// An allowed unit with the given labels.
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            allowed: true,
            singular: singular.into(),
            plural: plural.into(),
        }
    }

    /// Default English labels for `unit`.
    pub fn for_unit(unit: Unit) -> Self {
        Self::new(unit.singular_name(), unit.plural_name())
    }

    /// Sets whether the unit is rendered.
    pub fn with_allowed(mut self, allowed: bool) -> Self {
        self.allowed = allowed;
        self
    }
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            allowed: true,
            singular: String::new(),
            plural: String::new(),
        }
    }
}

/// Configuration for a countdown widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Keep counting up after the target has passed instead of stopping at zero.
    pub allow_negative: bool,
    /// Show only the most significant nonzero unit.
    pub compact: bool,
    /// Zero-pad values below ten to two digits.
    pub pad_values: bool,
    /// Years settings.
    pub years: UnitConfig,
    /// Weeks settings.
    pub weeks: UnitConfig,
    /// Days settings.
    pub days: UnitConfig,
    /// Hours settings.
    pub hours: UnitConfig,
    /// Minutes settings.
    pub minutes: UnitConfig,
    /// Seconds settings.
    pub seconds: UnitConfig,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            allow_negative: false,
            compact: false,
            pad_values: true,
            years: UnitConfig::for_unit(Unit::Years),
            weeks: UnitConfig::for_unit(Unit::Weeks),
            days: UnitConfig::for_unit(Unit::Days),
            hours: UnitConfig::for_unit(Unit::Hours),
            minutes: UnitConfig::for_unit(Unit::Minutes),
            seconds: UnitConfig::for_unit(Unit::Seconds),
        }
    }
}

impl TimerConfig {
    /// Same as [`TimerConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the countdown continues past the target as a count-up.
    pub fn with_allow_negative(mut self, allow_negative: bool) -> Self {
        self.allow_negative = allow_negative;
        self
    }

    /// Sets compact mode.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Sets zero padding.
    pub fn with_pad_values(mut self, pad_values: bool) -> Self {
        self.pad_values = pad_values;
        self
    }

    /// Replaces the settings of one unit.
    pub fn with_unit(mut self, unit: Unit, config: UnitConfig) -> Self {
        *self.unit_mut(unit) = config;
        self
    }

    /// Shows or hides one unit, keeping its labels.
    pub fn with_unit_allowed(mut self, unit: Unit, allowed: bool) -> Self {
        self.unit_mut(unit).allowed = allowed;
        self
    }

    /// Settings for `unit`.
    pub fn unit(&self, unit: Unit) -> &UnitConfig {
        match unit {
            Unit::Years => &self.years,
            Unit::Weeks => &self.weeks,
            Unit::Days => &self.days,
            Unit::Hours => &self.hours,
            Unit::Minutes => &self.minutes,
            Unit::Seconds => &self.seconds,
        }
    }

    /// Mutable settings for `unit`.
    pub fn unit_mut(&mut self, unit: Unit) -> &mut UnitConfig {
        match unit {
            Unit::Years => &mut self.years,
            Unit::Weeks => &mut self.weeks,
            Unit::Days => &mut self.days,
            Unit::Hours => &mut self.hours,
            Unit::Minutes => &mut self.minutes,
            Unit::Seconds => &mut self.seconds,
        }
    }

    /// Whether `unit` is rendered.
    pub fn is_allowed(&self, unit: Unit) -> bool {
        self.unit(unit).allowed
    }

    /// The units that are rendered, most significant first.
    pub fn allowed_units(&self) -> Vec<Unit> {
        Unit::ALL
            .into_iter()
            .filter(|unit| self.is_allowed(*unit))
            .collect()
    }

    /// Label for `value` of `unit`: singular for exactly 1, plural otherwise.
    ///
    /// Empty labels fall back to the English unit name.
    pub fn label(&self, unit: Unit, value: u64) -> &str {
        let config = self.unit(unit);
        if value == 1 {
            non_empty(&config.singular).unwrap_or(unit.singular_name())
        } else {
            non_empty(&config.plural).unwrap_or(unit.plural_name())
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
