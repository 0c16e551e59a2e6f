//! Countdown widget for Bubble Tea applications.
//!
//! The widget counts down to a fixed [`TargetMoment`] and renders the
//! remaining time as years, weeks, days, hours, minutes and seconds. Once the
//! target passes it either stops at zero and emits an [`EndMsg`], or, with
//! [`TimerConfig::allow_negative`], keeps counting up.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_countdown::countdown::{new, new_with_config};
//! use bubbletea_countdown::config::TimerConfig;
//! use bubbletea_countdown::target::TargetMoment;
//! use std::time::Duration;
//!
//! // Count down 90 seconds from now
//! let countdown = new(TargetMoment::after(Duration::from_secs(90)));
//!
//! // Count down to a date, showing only the most significant unit
//! let target = TargetMoment::parse_or_now("2030-01-01T00:00:00Z");
//! let compact = new_with_config(target, TimerConfig::default().with_compact(true));
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Model as BubbleTeaModel, Msg, Cmd};
//! use bubbletea_countdown::countdown::{new, EndMsg, Model};
//! use bubbletea_countdown::target::TargetMoment;
//! use std::time::Duration;
//!
//! struct MyApp {
//!     countdown: Model,
//! }
//!
//! impl BubbleTeaModel for MyApp {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut countdown = new(TargetMoment::after(Duration::from_secs(10)));
//!         let cmd = countdown.init();
//!         (Self { countdown }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(end) = msg.downcast_ref::<EndMsg>() {
//!             if end.id == self.countdown.id() {
//!                 // Countdown finished!
//!             }
//!         }
//!
//!         // Forward countdown messages
//!         self.countdown.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         format!("Launch in {}", self.countdown.view())
//!     }
//! }
//! ```
//!
//! # Callbacks
//!
//! Code that is not driven by messages can observe the countdown through
//! [`Callbacks`]:
//!
//! ```rust
//! use bubbletea_countdown::countdown::Model;
//! use bubbletea_countdown::config::TimerConfig;
//! use bubbletea_countdown::scheduler::Callbacks;
//! use bubbletea_countdown::target::TargetMoment;
//! use std::time::Duration;
//!
//! let countdown = Model::new(
//!     TargetMoment::after(Duration::from_secs(30)),
//!     TimerConfig::default(),
//!     Callbacks::new()
//!         .on_tick(|tick| println!("{} seconds left", tick.remaining_ms / 1000))
//!         .on_end(|_| println!("done")),
//! );
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use lipgloss_extras::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use crate::accessibility::LiveMode;
use crate::clock::{Clock, SystemClock};
use crate::config::TimerConfig;
use crate::scheduler::{Callbacks, CancellationHandle, State, TickEvent, Ticker, TICK_INTERVAL};
use crate::target::TargetMoment;
use crate::units::{format_value, Unit, UnitTuple};

// Internal ID management for countdown instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generates unique identifiers for countdown instances.
///
/// Several countdowns can live in one application; their tick messages are
/// told apart by this ID. IDs start at 1.
fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Message that advances a countdown by one tick.
///
/// Produced by the commands returned from [`Model::init`] and
/// [`Model::update`]; applications just forward it.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// The ID of the countdown this tick belongs to. Zero matches any countdown.
    pub id: i64,
    tag: i64,
}

/// Sent once when a countdown reaches zero and stops.
///
/// Never sent for countdowns that allow negative values, nor after
/// cancellation.
#[derive(Debug, Clone)]
pub struct EndMsg {
    /// The ID of the countdown that ended.
    pub id: i64,
}

/// A countdown widget.
///
/// The clock parameter exists for tests and simulations; applications use
/// the default [`SystemClock`].
#[derive(Debug)]
pub struct Model<C: Clock = SystemClock> {
    /// Style applied to each value, e.g. `"05"`.
    pub value_style: Style,

    /// Style applied to each label, e.g. `"minutes"`.
    pub label_style: Style,

    /// Placed between rendered units.
    pub separator: String,

    /// Rendered in front of the first unit while counting up past the target.
    pub negative_prefix: String,

    ticker: Ticker<C>,
    last: Option<TickEvent>,
    id: i64,
    tag: i64,
}

/// Creates a countdown to `target` with the default configuration.
pub fn new(target: TargetMoment) -> Model {
    Model::new(target, TimerConfig::default(), Callbacks::new())
}

/// Creates a countdown to `target` with a custom configuration.
pub fn new_with_config(target: TargetMoment, config: TimerConfig) -> Model {
    Model::new(target, config, Callbacks::new())
}

impl Model<SystemClock> {
    /// Creates a countdown on the system clock.
    ///
    /// `on_create` runs before this returns. No tick happens until
    /// [`Model::init`].
    pub fn new(target: TargetMoment, config: TimerConfig, callbacks: Callbacks) -> Self {
        Self::new_with_clock(target, config, SystemClock, callbacks)
    }
}

impl<C: Clock> Model<C> {
    /// Creates a countdown that reads time from `clock`.
    pub fn new_with_clock(
        target: TargetMoment,
        config: TimerConfig,
        clock: C,
        callbacks: Callbacks,
    ) -> Self {
        Self {
            value_style: Style::new(),
            label_style: Style::new(),
            separator: " ".to_string(),
            negative_prefix: "-".to_string(),
            ticker: Ticker::new(target, config, clock, callbacks),
            last: None,
            id: next_id(),
            tag: 0,
        }
    }

    /// Sets the value style.
    pub fn with_value_style(mut self, style: Style) -> Self {
        self.value_style = style;
        self
    }

    /// Sets the label style.
    pub fn with_label_style(mut self, style: Style) -> Self {
        self.label_style = style;
        self
    }

    /// Sets the separator placed between units.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sets the prefix shown while counting up.
    pub fn with_negative_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.negative_prefix = prefix.into();
        self
    }

    /// The unique ID of this countdown.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The instant being counted towards.
    pub fn target(&self) -> TargetMoment {
        self.ticker.target()
    }

    /// The configuration fixed at creation.
    pub fn config(&self) -> &TimerConfig {
        self.ticker.config()
    }

    /// Lifecycle state of the underlying ticker.
    pub fn state(&self) -> State {
        self.ticker.state()
    }

    /// Whether the countdown still reacts to ticks.
    pub fn running(&self) -> bool {
        self.ticker.is_running()
    }

    /// Whether the countdown reached zero and stopped.
    pub fn ended(&self) -> bool {
        self.ticker.state() == State::Ended
    }

    /// The most recent tick, if any.
    pub fn last_tick(&self) -> Option<&TickEvent> {
        self.last.as_ref()
    }

    /// A handle that stops this countdown from anywhere, e.g. another task.
    pub fn cancel_handle(&self) -> CancellationHandle {
        self.ticker.handle()
    }

    /// Stops the countdown. Pending tick messages are ignored afterwards and
    /// no [`EndMsg`] is sent.
    pub fn cancel(&mut self) {
        self.ticker.cancel();
    }

    /// A tick message addressed to this countdown's current tick chain.
    pub fn tick_msg(&self) -> TickMsg {
        TickMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;

        bubbletea_tick(TICK_INTERVAL, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    fn end(&self) -> Cmd {
        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(EndMsg { id }) as Msg
        })
    }

    /// Ticks once and returns the command for what comes next: the next
    /// tick while running, the [`EndMsg`] once ended, nothing when stopped.
    fn advance(&mut self) -> Option<Cmd> {
        let event = self.ticker.tick()?;
        self.last = Some(event);

        match self.ticker.state() {
            State::Running => {
                self.tag += 1;
                Some(self.tick())
            }
            State::Ended => Some(self.end()),
            State::Cancelled => None,
        }
    }

    /// Performs the first tick right away and schedules the next one.
    ///
    /// Returns the end command instead when the target has already passed,
    /// and `None` if the countdown was cancelled or has already ended.
    pub fn init(&mut self) -> Option<Cmd> {
        self.advance()
    }

    /// Handles a message.
    ///
    /// Only [`TickMsg`] values addressed to this countdown, and belonging to
    /// its current tick chain, are acted on. Everything else returns `None`.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(tick_msg) = msg.downcast_ref::<TickMsg>() {
            if tick_msg.id > 0 && tick_msg.id != self.id {
                return None;
            }

            // A stale tag means another tick chain is already running; drop
            // it so the countdown does not tick twice per interval.
            if tick_msg.tag > 0 && tick_msg.tag != self.tag {
                return None;
            }

            return self.advance();
        }

        None
    }

    /// Live-region politeness for the most recent tick.
    pub fn live_mode(&self) -> LiveMode {
        self.last
            .as_ref()
            .map(|event| event.accessibility.live)
            .unwrap_or_default()
    }

    /// Renders the allowed units as `value label` pairs.
    ///
    /// In compact mode only the most significant nonzero unit is shown.
    /// Before the first tick every unit reads zero.
    pub fn view(&self) -> String {
        let config = self.ticker.config();
        let units = self
            .last
            .as_ref()
            .map(|event| event.units)
            .unwrap_or(UnitTuple::ZERO);

        let shown = match self.last.as_ref().and_then(|event| event.compact) {
            Some(unit) => vec![unit],
            None => config.allowed_units(),
        };

        let body = shown
            .into_iter()
            .map(|unit| self.render_unit(unit, units.get(unit)))
            .collect::<Vec<_>>()
            .join(&self.separator);

        match &self.last {
            Some(event) if event.is_negative => format!("{}{}", self.negative_prefix, body),
            _ => body,
        }
    }

    fn render_unit(&self, unit: Unit, value: u64) -> String {
        let config = self.ticker.config();
        format!(
            "{} {}",
            self.value_style
                .render(&format_value(value, config.pad_values)),
            self.label_style.render(config.label(unit, value))
        )
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let mut model = Self::default();
        let cmd = model.init();
        (model, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

impl Default for Model {
    fn default() -> Self {
        new(TargetMoment::after(Duration::from_secs(60)))
    }
}
