#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/bubbletea-countdown/")]

//! # bubbletea-countdown
//!
//! A countdown (and count-up) timer widget for terminal applications built
//! with [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//!
//! ## Overview
//!
//! The widget counts towards a fixed target instant and shows the remaining
//! time broken down into years, weeks, days, hours, minutes and seconds. The
//! breakdown is calendar aware: leap days spanned by the countdown are folded
//! back into the day count.
//!
//! Like the other bubbletea widgets it follows the Elm Architecture with
//! `init()`, `update()` and `view()`. The same tick logic is also available
//! without bubbletea, as a tokio task driven by [`scheduler::start`] that
//! reports through plain callbacks.
//!
//! ## Features
//!
//! - **Calendar-aware breakdown** into six units with leap-year correction
//! - **Count-up mode** that keeps going once the target has passed
//! - **Compact mode** showing only the most significant nonzero unit
//! - **Configurable units** with custom singular/plural labels and optional zero padding
//! - **Accessibility hints** telling hosts which unit matters and when to announce
//! - **Cancellation** through a cloneable handle
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`countdown`] | The bubbletea widget |
//! | [`scheduler`] | Tick state machine, callbacks and the tokio driver |
//! | [`decompose`] | Duration to unit breakdown |
//! | [`units`] | `Unit`, `UnitTuple`, padding |
//! | [`config`] | `TimerConfig`, `UnitConfig` |
//! | [`target`] | `TargetMoment` and date-string parsing |
//! | [`accessibility`] | Screen-reader hints |
//! | [`clock`] | Time sources |
//!
//! ## Integration with bubbletea-rs
//!
//! ```rust
//! use bubbletea_countdown::prelude::*;
//! use bubbletea_rs::{Model, Cmd, Msg};
//!
//! struct App {
//!     countdown: Countdown,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let target = TargetMoment::parse_or_now("2030-01-01T00:00:00Z");
//!         let config = TimerConfig::default().with_compact(true);
//!         let mut countdown = countdown_new_with_config(target, config);
//!         let cmd = countdown.init();
//!         (Self { countdown }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if msg.downcast_ref::<CountdownEndMsg>().is_some() {
//!             // Happy new year!
//!             return None;
//!         }
//!         self.countdown.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         format!("New year in {}", self.countdown.view())
//!     }
//! }
//! ```
//!
//! ## Without bubbletea
//!
//! ```rust
//! use bubbletea_countdown::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let handle = start(
//!     TargetMoment::after(Duration::from_secs(5)),
//!     TimerConfig::default(),
//!     Callbacks::new()
//!         .on_tick(|tick| println!("{:?}", tick.units))
//!         .on_end(|_| println!("done")),
//! );
//!
//! // Later, from anywhere:
//! handle.cancel();
//! # }
//! ```

pub mod accessibility;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod decompose;
pub mod error;
pub mod scheduler;
pub mod target;
pub mod units;

pub use accessibility::{AccessibilityHint, Announcement, LiveMode, Visibility};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{TimerConfig, UnitConfig};
pub use countdown::{
    new as countdown_new, new_with_config as countdown_new_with_config, EndMsg as CountdownEndMsg,
    Model as Countdown, TickMsg as CountdownTickMsg,
};
pub use decompose::{decompose, decompose_in, is_leap_year};
pub use error::TargetError;
pub use scheduler::{
    start, start_with_clock, Callbacks, CancellationHandle, CreateEvent, EndEvent, State,
    TickEvent, Ticker,
};
pub use target::TargetMoment;
pub use units::{Unit, UnitTuple};

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_countdown::prelude::*;
///
/// let config = TimerConfig::default().with_pad_values(false);
/// let countdown: Countdown = countdown_new_with_config(TargetMoment::now(), config);
/// assert_eq!(countdown.config().pad_values, false);
/// ```
pub mod prelude {
    pub use crate::accessibility::{AccessibilityHint, Announcement, LiveMode, Visibility};
    pub use crate::config::{TimerConfig, UnitConfig};
    pub use crate::countdown::{
        new as countdown_new, new_with_config as countdown_new_with_config,
        EndMsg as CountdownEndMsg, Model as Countdown, TickMsg as CountdownTickMsg,
    };
    pub use crate::error::TargetError;
    pub use crate::scheduler::{start, Callbacks, CancellationHandle, State, TickEvent};
    pub use crate::target::TargetMoment;
    pub use crate::units::{Unit, UnitTuple};
}
