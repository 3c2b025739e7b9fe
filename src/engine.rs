//! Drive a countdown at a fixed cadence
//!
//! [`CountdownEngine::start`] computes the remaining time right away, then
//! spawns a task that re-samples the clock once per interval and publishes
//! the new [`RemainingDuration`] to whoever holds the returned
//! [`CountdownHandle`]. Dropping or cancelling the handle stops the task.

use std::time::Duration;

use chrono::prelude::*;
use log::{debug, info, trace, warn};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use crate::time::{tick, DurationExt, RemainingDuration};

/// Default time between recomputations
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Source of wall-clock readings
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Local>;
}

/// The system wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// One published countdown value
///
/// `seq` is 0 for the value computed at start and increases by one for
/// every scheduled recomputation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tick {
    pub seq: u64,
    pub remaining: RemainingDuration,
}

/// Counts down to a fixed target instant
#[derive(Debug)]
pub struct CountdownEngine<C = SystemClock> {
    target: DateTime<Local>,
    clock: C,
}

impl CountdownEngine<SystemClock> {
    pub fn new(target: DateTime<Local>) -> Self {
        Self::with_clock(target, SystemClock)
    }
}

impl<C: Clock> CountdownEngine<C> {
    pub fn with_clock(target: DateTime<Local>, clock: C) -> Self {
        Self { target, clock }
    }

    pub fn target(&self) -> DateTime<Local> {
        self.target
    }

    /// Compute the remaining time against the current clock reading
    pub fn initialize(&self) -> RemainingDuration {
        tick(self.target, self.clock.now())
    }

    /// Start recomputing every `interval`
    ///
    /// The first value is available from the handle immediately; the next
    /// one arrives after one full interval. Must be called from within a
    /// tokio runtime.
    pub fn start(self, interval: Duration) -> CountdownHandle {
        let period = if interval.is_zero() {
            warn!("Tick interval must be non-zero, using {}", TICK_INTERVAL.to_human());
            TICK_INTERVAL
        } else {
            interval
        };

        let initial = self.initialize();
        let (tx, rx) = watch::channel(Tick {
            seq: 0,
            remaining: initial,
        });

        info!(
            "Counting down to {} every {} ({} remaining)",
            self.target.to_rfc3339(),
            period.to_human(),
            initial
        );

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut seq = 0;
            let mut expired = initial.is_zero();

            loop {
                interval.tick().await;

                seq += 1;
                let remaining = tick(self.target, self.clock.now());
                trace!("tick {}: {}", seq, remaining);

                if remaining.is_zero() && !expired {
                    info!("Countdown to {} reached zero", self.target.to_rfc3339());
                    expired = true;
                }

                if tx.send(Tick { seq, remaining }).is_err() {
                    debug!("All receivers gone, countdown task stopped after {} ticks", seq);
                    break;
                }
            }
        });

        CountdownHandle {
            rx,
            task,
            cancelled: false,
        }
    }
}

/// Owner of a running countdown
///
/// The countdown stops when [`CountdownHandle::cancel`] is called or the
/// handle is dropped, whichever comes first.
#[derive(Debug)]
pub struct CountdownHandle {
    rx: watch::Receiver<Tick>,
    task: JoinHandle<()>,
    cancelled: bool,
}

impl CountdownHandle {
    /// The most recently published value
    pub fn current(&self) -> Tick {
        *self.rx.borrow()
    }

    /// An extra receiver of published values
    pub fn subscribe(&self) -> watch::Receiver<Tick> {
        self.rx.clone()
    }

    /// Wait for the next published value
    ///
    /// Returns `None` once the countdown has stopped.
    pub async fn changed(&mut self) -> Option<Tick> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// Wait until a zero duration has been published
    pub async fn expired(&mut self) -> Option<Tick> {
        loop {
            let current = *self.rx.borrow_and_update();
            if current.remaining.is_zero() {
                return Some(current);
            }

            self.rx.changed().await.ok()?;
        }
    }

    /// Stop the countdown
    ///
    /// Aborting the task drops its sender, so waiting receivers see the
    /// channel close. Returns `false` if it was already stopped.
    pub fn cancel(&mut self) -> bool {
        if self.cancelled {
            return false;
        }

        self.task.abort();
        self.cancelled = true;
        debug!("Countdown cancelled");

        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use chrono::{prelude::*, TimeDelta};
    use tokio::time::Instant;

    use super::{Clock, CountdownEngine};

    /// Wall clock that follows tokio's (paused) time
    struct PausedClock {
        base: DateTime<Local>,
        started: Instant,
    }

    impl PausedClock {
        fn new(base: DateTime<Local>) -> Self {
            Self {
                base,
                started: Instant::now(),
            }
        }
    }

    impl Clock for PausedClock {
        fn now(&self) -> DateTime<Local> {
            let elapsed = Instant::now() - self.started;
            self.base + TimeDelta::from_std(elapsed).unwrap()
        }
    }

    fn base() -> DateTime<Local> {
        "2024-10-31T22:00:00-05:00".parse().unwrap()
    }

    fn engine(seconds_left: i64) -> CountdownEngine<PausedClock> {
        let target = base() + TimeDelta::seconds(seconds_left);
        CountdownEngine::with_clock(target, PausedClock::new(base()))
    }

    #[tokio::test(start_paused = true)]
    async fn first_value_is_available_immediately() {
        let handle = engine(10).start(Duration::from_secs(1));

        let first = handle.current();

        assert_eq!(first.seq, 0);
        assert_eq!(first.remaining.total_seconds(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_once_per_interval() {
        let mut handle = engine(10).start(Duration::from_secs(1));
        let started = Instant::now();

        let next = handle.changed().await.unwrap();
        assert_eq!(next.seq, 1);
        assert_eq!(next.remaining.total_seconds(), 9);
        assert_eq!(Instant::now() - started, Duration::from_secs(1));

        let next = handle.changed().await.unwrap();
        assert_eq!(next.seq, 2);
        assert_eq!(next.remaining.total_seconds(), 8);
        assert_eq!(Instant::now() - started, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn freezes_at_zero_and_keeps_ticking() {
        let mut handle = engine(3).start(Duration::from_secs(1));

        let expired = handle.expired().await.unwrap();
        assert_eq!(expired.seq, 3);
        assert!(expired.remaining.is_zero());

        let after = handle.changed().await.unwrap();
        assert_eq!(after.seq, 4);
        assert!(after.remaining.is_zero());
    }

    #[tokio::test(start_paused = true)]
    async fn past_target_is_zero_from_the_start() {
        let mut handle = engine(-60).start(Duration::from_secs(1));

        assert!(handle.current().remaining.is_zero());

        let expired = handle.expired().await.unwrap();
        assert_eq!(expired.seq, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_published_after_cancel() {
        let mut handle = engine(10).start(Duration::from_secs(1));

        assert!(handle.cancel());
        assert!(handle.is_cancelled());
        assert!(!handle.cancel());

        assert_eq!(handle.changed().await, None);
        assert_eq!(handle.current().seq, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_ticks_stops_publishing() {
        let mut handle = engine(10).start(Duration::from_secs(1));

        let next = handle.changed().await.unwrap();
        assert_eq!(next.seq, 1);

        assert!(handle.cancel());
        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(handle.changed().await, None);
        assert_eq!(handle.current().seq, 1);
        assert_eq!(handle.current().remaining.total_seconds(), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_task() {
        let handle = engine(10).start(Duration::from_secs(1));
        let mut rx = handle.subscribe();

        drop(handle);

        assert!(rx.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_falls_back_to_default() {
        let mut handle = engine(10).start(Duration::ZERO);
        let started = Instant::now();

        handle.changed().await.unwrap();

        assert_eq!(Instant::now() - started, super::TICK_INTERVAL);
    }

    #[test]
    fn initialize_uses_the_clock() {
        let engine = CountdownEngine::with_clock(
            "2024-10-31T23:59:59-05:00".parse().unwrap(),
            FixedClock("2024-10-30T23:59:59-05:00".parse().unwrap()),
        );

        assert_eq!(engine.initialize().parts(), (1, 0, 0, 0));
    }

    struct FixedClock(DateTime<Local>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Local> {
            self.0
        }
    }
}
