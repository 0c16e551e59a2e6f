//! Per-widget tick scheduling.
//!
//! A [`Ticker`] owns everything one countdown needs: the target, its
//! configuration, a [`Clock`] and the user callbacks. Each call to
//! [`Ticker::tick`] reads the clock, breaks the remaining time into units and
//! hands the result to `on_tick`. Once the target passes and negative
//! durations are not allowed, the final tick reports all zeros, `on_end`
//! fires and the ticker stops for good.
//!
//! [`start`] drives a ticker on the tokio runtime: one tick immediately, then
//! one every [`TICK_INTERVAL`]. The returned [`CancellationHandle`] stops it.
//!
//! ```text
//! Running ──(target passed, negatives disallowed)──▶ Ended
//!    │
//!    └──────────────(handle cancelled)──────────────▶ Cancelled
//! ```
//!
//! # Examples
//!
//! ```rust
//! use bubbletea_countdown::clock::ManualClock;
//! use bubbletea_countdown::config::TimerConfig;
//! use bubbletea_countdown::scheduler::{Callbacks, State, Ticker};
//! use bubbletea_countdown::target::TargetMoment;
//! use std::time::Duration;
//!
//! let clock = ManualClock::new(0);
//! let mut ticker = Ticker::new(
//!     TargetMoment::from_epoch_millis(2_000),
//!     TimerConfig::default(),
//!     clock.clone(),
//!     Callbacks::new(),
//! );
//!
//! assert_eq!(ticker.tick().unwrap().units.seconds, 2);
//! clock.advance(Duration::from_secs(2));
//! assert!(ticker.tick().unwrap().units.is_zero());
//! assert_eq!(ticker.state(), State::Ended);
//! assert!(ticker.tick().is_none());
//! ```

use std::fmt;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::accessibility::AccessibilityHint;
use crate::clock::{Clock, SystemClock};
use crate::config::TimerConfig;
use crate::target::TargetMoment;
use crate::units::{Unit, UnitTuple};

/// Time between ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Passed to `on_create` once, when a widget is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateEvent {
    /// Target instant in epoch milliseconds.
    pub target_time: i64,
}

/// Passed to `on_end` once, when the countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndEvent {
    /// Target instant in epoch milliseconds.
    pub target_time: i64,
}

/// The result of one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickEvent {
    /// Target instant in epoch milliseconds.
    pub target_time: i64,
    /// Target minus now. Zero on the final tick of a countdown that does not
    /// allow negative values; negative while counting up.
    pub remaining_ms: i64,
    /// Whether the target lies in the past.
    pub is_negative: bool,
    /// The remaining (or elapsed) time, unpadded.
    pub units: UnitTuple,
    /// Most significant nonzero unit among the allowed ones.
    pub active: Option<Unit>,
    /// The single unit to show in compact mode; `None` when compact mode is
    /// off or nothing is left to show.
    pub compact: Option<Unit>,
    /// Screen-reader hint for this tick.
    pub accessibility: AccessibilityHint,
}

/// Lifecycle of a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Ticking.
    Running,
    /// Reached zero with negative values disallowed. Terminal.
    Ended,
    /// Stopped through a [`CancellationHandle`]. Terminal.
    Cancelled,
}

type CreateCallback = Box<dyn FnMut(&CreateEvent) + Send>;
type TickCallback = Box<dyn FnMut(&TickEvent) + Send>;
type EndCallback = Box<dyn FnMut(&EndEvent) + Send>;

/// User hooks for a countdown. Hooks that are not set do nothing.
///
/// Panics raised inside a hook are not caught.
pub struct Callbacks {
    on_create: CreateCallback,
    on_tick: TickCallback,
    on_end: EndCallback,
}

impl Callbacks {
    /// Callbacks that do nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once when the widget is created.
    pub fn on_create(mut self, f: impl FnMut(&CreateEvent) + Send + 'static) -> Self {
        self.on_create = Box::new(f);
        self
    }

    /// Called on every tick, including the final all-zero one.
    pub fn on_tick(mut self, f: impl FnMut(&TickEvent) + Send + 'static) -> Self {
        self.on_tick = Box::new(f);
        self
    }

    /// Called once when the countdown ends by itself. Never called after
    /// cancellation or while counting up.
    pub fn on_end(mut self, f: impl FnMut(&EndEvent) + Send + 'static) -> Self {
        self.on_end = Box::new(f);
        self
    }
}

impl Default for Callbacks {
    fn default() -> Self {
        Self {
            on_create: Box::new(|_| {}),
            on_tick: Box::new(|_| {}),
            on_end: Box::new(|_| {}),
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// Stops a running countdown.
///
/// Clones refer to the same countdown. Cancelling is idempotent, takes
/// effect before the next tick and never triggers `on_end`.
///
/// A handle returned by [`start`] also owns the spawned ticker task; await
/// [`CancellationHandle::finished`] to learn when it stops and to receive
/// any panic raised by a callback.
#[derive(Debug, Clone, Default)]
pub struct CancellationHandle {
    inner: Arc<CancelState>,
}

impl CancellationHandle {
    /// A handle that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppresses all future ticks.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Whether [`CancellationHandle::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the handle is cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Whether the spawned ticker task, if any, has stopped.
    ///
    /// Always `true` for handles that never drove a task, and once the task
    /// has been taken by [`CancellationHandle::finished`].
    pub fn is_finished(&self) -> bool {
        self.task()
            .as_ref()
            .map_or(true, |task| task.is_finished())
    }

    /// Waits for the spawned ticker task to stop.
    ///
    /// Resolves right away when there is no task, or when another clone is
    /// already waiting for it.
    ///
    /// # Panics
    ///
    /// Resumes the panic of a callback that panicked inside the task.
    pub async fn finished(&self) {
        let task = self.task().take();
        let Some(task) = task else {
            return;
        };

        if let Err(err) = task.await {
            if err.is_panic() {
                tracing::warn!("countdown callback panicked");
                panic::resume_unwind(err.into_panic());
            }
        }
    }

    fn attach(&self, task: JoinHandle<()>) {
        *self.task() = Some(task);
    }

    fn task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// The tick state machine for one countdown.
#[derive(Debug)]
pub struct Ticker<C: Clock = SystemClock> {
    target: TargetMoment,
    config: TimerConfig,
    clock: C,
    callbacks: Callbacks,
    state: State,
    handle: CancellationHandle,
}

impl<C: Clock> Ticker<C> {
    /// Sets up a ticker and fires `on_create`. Does not tick.
    pub fn new(
        target: TargetMoment,
        config: TimerConfig,
        clock: C,
        mut callbacks: Callbacks,
    ) -> Self {
        tracing::debug!(target_time = target.epoch_millis(), "countdown created");
        (callbacks.on_create)(&CreateEvent {
            target_time: target.epoch_millis(),
        });

        Self {
            target,
            config,
            clock,
            callbacks,
            state: State::Running,
            handle: CancellationHandle::new(),
        }
    }

    /// The instant being counted towards.
    pub fn target(&self) -> TargetMoment {
        self.target
    }

    /// The configuration fixed at creation.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether further ticks will produce events.
    pub fn is_running(&self) -> bool {
        self.state == State::Running && !self.handle.is_cancelled()
    }

    /// A handle that cancels this ticker.
    pub fn handle(&self) -> CancellationHandle {
        self.handle.clone()
    }

    /// Cancels the ticker. Has no effect once it has ended.
    pub fn cancel(&mut self) {
        self.handle.cancel();
        self.observe_cancellation();
    }

    /// Runs one tick.
    ///
    /// Returns the event passed to `on_tick`, or `None` when the ticker has
    /// ended or been cancelled.
    pub fn tick(&mut self) -> Option<TickEvent> {
        self.observe_cancellation();
        if self.state != State::Running {
            return None;
        }

        let target_ms = self.target.epoch_millis();
        let now_ms = self.clock.now_ms();
        let diff = target_ms.saturating_sub(now_ms);
        let expired = diff <= 0 && !self.config.allow_negative;

        let event = if expired {
            self.event(0, UnitTuple::ZERO)
        } else {
            let units = self.clock.decompose(diff, target_ms, now_ms);
            self.event(diff, units)
        };

        tracing::trace!(remaining_ms = event.remaining_ms, units = ?event.units, "countdown tick");
        (self.callbacks.on_tick)(&event);

        if expired {
            self.state = State::Ended;
            tracing::debug!(target_time = target_ms, "countdown ended");
            (self.callbacks.on_end)(&EndEvent {
                target_time: target_ms,
            });
        }

        Some(event)
    }

    fn event(&self, remaining_ms: i64, units: UnitTuple) -> TickEvent {
        let active = units.highest_nonzero_where(|unit| self.config.is_allowed(unit));
        TickEvent {
            target_time: self.target.epoch_millis(),
            remaining_ms,
            is_negative: remaining_ms < 0,
            units,
            active,
            compact: if self.config.compact { active } else { None },
            accessibility: AccessibilityHint::for_active(active, units.seconds),
        }
    }

    fn observe_cancellation(&mut self) {
        if self.state == State::Running && self.handle.is_cancelled() {
            self.state = State::Cancelled;
            tracing::debug!(
                target_time = self.target.epoch_millis(),
                "countdown cancelled"
            );
        }
    }
}

impl<C: Clock + Send + 'static> Ticker<C> {
    /// Ticks every [`TICK_INTERVAL`] until the ticker ends or is cancelled.
    ///
    /// The first tick happens one interval after the call; run
    /// [`Ticker::tick`] beforehand for an immediate one.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let handle = self.handle();

        while self.is_running() {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick();
                }
                _ = handle.cancelled() => {}
            }
        }
        self.observe_cancellation();
    }
}

/// Starts a countdown on the current tokio runtime using the system clock.
///
/// Fires `on_create`, performs the first tick synchronously and then ticks
/// once per second in a spawned task. A panic in the first tick reaches the
/// caller directly; later ones surface through
/// [`CancellationHandle::finished`].
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
///
/// # Examples
///
/// ```rust
/// use bubbletea_countdown::config::TimerConfig;
/// use bubbletea_countdown::scheduler::{start, Callbacks};
/// use bubbletea_countdown::target::TargetMoment;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let handle = start(
///     TargetMoment::after(Duration::from_secs(90)),
///     TimerConfig::default(),
///     Callbacks::new().on_tick(|event| {
///         println!("{}m {}s left", event.units.minutes, event.units.seconds);
///     }),
/// );
/// handle.cancel();
/// # }
/// ```
pub fn start(
    target: TargetMoment,
    config: TimerConfig,
    callbacks: Callbacks,
) -> CancellationHandle {
    start_with_clock(target, config, SystemClock, callbacks)
}

/// Like [`start`] with an explicit clock.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn start_with_clock<C: Clock + Send + 'static>(
    target: TargetMoment,
    config: TimerConfig,
    clock: C,
    callbacks: Callbacks,
) -> CancellationHandle {
    let mut ticker = Ticker::new(target, config, clock, callbacks);
    let handle = ticker.handle();

    ticker.tick();
    if ticker.is_running() {
        handle.attach(tokio::spawn(ticker.run()));
    }

    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::AtomicUsize;

    fn base_ms() -> i64 {
        Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    struct Recorder {
        created: Arc<Mutex<Vec<CreateEvent>>>,
        ticks: Arc<Mutex<Vec<TickEvent>>>,
        ends: Arc<AtomicUsize>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                created: Arc::new(Mutex::new(Vec::new())),
                ticks: Arc::new(Mutex::new(Vec::new())),
                ends: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn callbacks(&self) -> Callbacks {
            let created = Arc::clone(&self.created);
            let ticks = Arc::clone(&self.ticks);
            let ends = Arc::clone(&self.ends);
            Callbacks::new()
                .on_create(move |event| created.lock().unwrap().push(*event))
                .on_tick(move |event| ticks.lock().unwrap().push(event.clone()))
                .on_end(move |_| {
                    ends.fetch_add(1, Ordering::SeqCst);
                })
        }

        fn ticks(&self) -> Vec<TickEvent> {
            self.ticks.lock().unwrap().clone()
        }

        fn end_count(&self) -> usize {
            self.ends.load(Ordering::SeqCst)
        }
    }

    fn ticker_in(
        offset_ms: i64,
        config: TimerConfig,
        recorder: &Recorder,
    ) -> (Ticker<ManualClock>, ManualClock) {
        let clock = ManualClock::new(base_ms());
        let target = TargetMoment::from_epoch_millis(base_ms() + offset_ms);
        let ticker = Ticker::new(target, config, clock.clone(), recorder.callbacks());
        (ticker, clock)
    }

    #[test]
    fn test_on_create_fires_once_with_target() {
        let recorder = Recorder::new();
        let (ticker, _clock) = ticker_in(90_000, TimerConfig::default(), &recorder);

        let created = recorder.created.lock().unwrap().clone();
        assert_eq!(
            created,
            vec![CreateEvent {
                target_time: base_ms() + 90_000
            }]
        );
        assert_eq!(ticker.state(), State::Running);
        assert!(recorder.ticks().is_empty());
    }

    #[test]
    fn test_ninety_second_countdown() {
        let recorder = Recorder::new();
        let (mut ticker, clock) = ticker_in(90_000, TimerConfig::default(), &recorder);

        let first = ticker.tick().unwrap();
        assert_eq!(first.units.to_array(), [0, 0, 0, 0, 1, 30]);
        assert_eq!(first.remaining_ms, 90_000);
        assert!(!first.is_negative);

        clock.advance(Duration::from_secs(60));
        let after_minute = ticker.tick().unwrap();
        assert_eq!(after_minute.units.to_array(), [0, 0, 0, 0, 0, 30]);

        clock.advance(Duration::from_secs(29));
        assert_eq!(ticker.tick().unwrap().units.seconds, 1);
        assert_eq!(recorder.end_count(), 0);

        clock.advance(Duration::from_secs(1));
        let last = ticker.tick().unwrap();
        assert!(last.units.is_zero());
        assert_eq!(last.remaining_ms, 0);
        assert_eq!(ticker.state(), State::Ended);
        assert_eq!(recorder.end_count(), 1);

        clock.advance(Duration::from_secs(1));
        assert!(ticker.tick().is_none());
        assert_eq!(recorder.end_count(), 1);
        assert_eq!(recorder.ticks().len(), 4);
    }

    #[test]
    fn test_already_expired_target_ends_on_first_tick() {
        let recorder = Recorder::new();
        let (mut ticker, _clock) = ticker_in(-5_000, TimerConfig::default(), &recorder);

        let event = ticker.tick().unwrap();
        assert!(event.units.is_zero());
        assert!(!event.is_negative);
        assert_eq!(ticker.state(), State::Ended);
        assert_eq!(recorder.end_count(), 1);
    }

    #[test]
    fn test_count_up_past_target() {
        let recorder = Recorder::new();
        let config = TimerConfig::default().with_allow_negative(true);
        let (mut ticker, clock) = ticker_in(-10_000, config, &recorder);

        let mut previous = 0;
        for _ in 0..5 {
            let event = ticker.tick().unwrap();
            assert!(event.is_negative);
            assert!(event.remaining_ms < 0);
            assert!(event.units.seconds > previous);
            previous = event.units.seconds;
            clock.advance(Duration::from_secs(1));
        }

        assert_eq!(previous, 14);
        assert_eq!(ticker.state(), State::Running);
        assert_eq!(recorder.end_count(), 0);
    }

    #[test]
    fn test_count_up_passes_through_zero_without_ending() {
        let recorder = Recorder::new();
        let config = TimerConfig::default().with_allow_negative(true);
        let (mut ticker, clock) = ticker_in(1_000, config, &recorder);

        assert_eq!(ticker.tick().unwrap().units.seconds, 1);
        clock.advance(Duration::from_secs(1));
        let zero = ticker.tick().unwrap();
        assert!(zero.units.is_zero());
        assert!(!zero.is_negative);
        clock.advance(Duration::from_secs(1));
        let past = ticker.tick().unwrap();
        assert!(past.is_negative);
        assert_eq!(past.units.seconds, 1);
        assert_eq!(recorder.end_count(), 0);
    }

    #[test]
    fn test_cancel_suppresses_ticks_without_ending() {
        let recorder = Recorder::new();
        let (mut ticker, clock) = ticker_in(90_000, TimerConfig::default(), &recorder);
        let handle = ticker.handle();

        assert!(ticker.tick().is_some());
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());

        clock.advance(Duration::from_secs(120));
        assert!(ticker.tick().is_none());
        assert_eq!(ticker.state(), State::Cancelled);
        assert_eq!(recorder.end_count(), 0);
        assert_eq!(recorder.ticks().len(), 1);
    }

    #[test]
    fn test_cancel_after_end_keeps_ended_state() {
        let recorder = Recorder::new();
        let (mut ticker, _clock) = ticker_in(0, TimerConfig::default(), &recorder);

        ticker.tick();
        ticker.cancel();
        assert_eq!(ticker.state(), State::Ended);
        assert_eq!(recorder.end_count(), 1);
    }

    #[test]
    fn test_compact_unit_follows_highest_nonzero() {
        let recorder = Recorder::new();
        let config = TimerConfig::default().with_compact(true);
        let offset = (3 * 86_400 + 45) * 1_000;
        let (mut ticker, clock) = ticker_in(offset, config, &recorder);

        let event = ticker.tick().unwrap();
        assert_eq!(event.units.to_array(), [0, 0, 3, 0, 0, 45]);
        assert_eq!(event.compact, Some(Unit::Days));

        clock.advance(Duration::from_secs(3 * 86_400));
        let event = ticker.tick().unwrap();
        assert_eq!(event.compact, Some(Unit::Seconds));
    }

    #[test]
    fn test_compact_off_reports_no_compact_unit() {
        let recorder = Recorder::new();
        let (mut ticker, _clock) = ticker_in(120_000, TimerConfig::default(), &recorder);

        let event = ticker.tick().unwrap();
        assert_eq!(event.active, Some(Unit::Minutes));
        assert_eq!(event.compact, None);
    }

    #[test]
    fn test_active_unit_skips_disallowed_units() {
        let recorder = Recorder::new();
        let config = TimerConfig::default()
            .with_compact(true)
            .with_unit_allowed(Unit::Minutes, false);
        let (mut ticker, _clock) = ticker_in(125_000, config, &recorder);

        let event = ticker.tick().unwrap();
        assert_eq!(event.units.to_array(), [0, 0, 0, 0, 2, 5]);
        assert_eq!(event.compact, Some(Unit::Seconds));
    }

    /// Reads tokio's (pausable) clock so spawned tickers see virtual time.
    #[derive(Clone)]
    struct PausedClock {
        base_ms: i64,
        origin: Instant,
    }

    impl PausedClock {
        fn new(base_ms: i64) -> Self {
            Self {
                base_ms,
                origin: Instant::now(),
            }
        }
    }

    impl Clock for PausedClock {
        fn now_ms(&self) -> i64 {
            self.base_ms + self.origin.elapsed().as_millis() as i64
        }

        fn decompose(&self, duration_ms: i64, target_ms: i64, now_ms: i64) -> UnitTuple {
            crate::decompose::decompose_in(&Utc, duration_ms, target_ms, now_ms)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_ticks_until_end() {
        let recorder = Recorder::new();
        let clock = PausedClock::new(base_ms());
        let handle = start_with_clock(
            TargetMoment::from_epoch_millis(base_ms() + 3_000),
            TimerConfig::default(),
            clock,
            recorder.callbacks(),
        );

        // first tick is synchronous
        assert_eq!(recorder.ticks().len(), 1);
        assert_eq!(recorder.ticks()[0].units.seconds, 3);

        tokio::time::sleep(Duration::from_secs(10)).await;

        let ticks = recorder.ticks();
        let last = ticks.last().unwrap();
        assert!(last.units.is_zero());
        assert!(!last.is_negative);
        assert!(ticks
            .windows(2)
            .all(|pair| pair[1].units.seconds <= pair[0].units.seconds));
        assert_eq!(recorder.end_count(), 1);
        assert!(!handle.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_cancel_stops_future_ticks() {
        let recorder = Recorder::new();
        let handle = start_with_clock(
            TargetMoment::from_epoch_millis(base_ms() + 3_600_000),
            TimerConfig::default(),
            PausedClock::new(base_ms()),
            recorder.callbacks(),
        );

        handle.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        handle.cancel();

        assert_eq!(recorder.ticks().len(), 1);
        assert_eq!(recorder.end_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_counts_up_until_cancelled() {
        let recorder = Recorder::new();
        let handle = start_with_clock(
            TargetMoment::from_epoch_millis(base_ms() - 10_000),
            TimerConfig::default().with_allow_negative(true),
            PausedClock::new(base_ms()),
            recorder.callbacks(),
        );

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        handle.cancel();

        let seconds: Vec<u64> = recorder.ticks().iter().map(|t| t.units.seconds).collect();
        assert_eq!(seconds, vec![10, 11, 12, 13]);
        assert!(recorder.ticks().iter().all(|t| t.is_negative));
        assert_eq!(recorder.end_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_panic_reaches_caller() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let handle = start_with_clock(
            TargetMoment::from_epoch_millis(base_ms() + 5_000),
            TimerConfig::default(),
            PausedClock::new(base_ms()),
            Callbacks::new().on_tick(move |_| {
                if seen.fetch_add(1, Ordering::SeqCst) == 1 {
                    panic!("tick callback failed");
                }
            }),
        );
        assert!(!handle.is_finished());

        let waiter = handle.clone();
        let err = tokio::spawn(async move { waiter.finished().await })
            .await
            .unwrap_err();

        assert!(err.is_panic());
        let payload = err.into_panic();
        assert_eq!(
            payload.downcast_ref::<&str>().copied(),
            Some("tick callback failed")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(handle.is_finished());
        assert!(!handle.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_after_natural_end() {
        let recorder = Recorder::new();
        let handle = start_with_clock(
            TargetMoment::from_epoch_millis(base_ms() + 2_000),
            TimerConfig::default(),
            PausedClock::new(base_ms()),
            recorder.callbacks(),
        );

        handle.finished().await;

        assert!(handle.is_finished());
        assert_eq!(recorder.end_count(), 1);
        assert!(recorder.ticks().last().unwrap().units.is_zero());
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves() {
        let handle = CancellationHandle::new();
        let waiter = handle.clone();
        let task = tokio::spawn(async move { waiter.cancelled().await });
        handle.cancel();
        task.await.unwrap();
        assert!(handle.is_cancelled());
    }
}
