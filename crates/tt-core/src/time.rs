//! Simulation time model.
//!
//! # Design
//!
//! Two notions of time coexist:
//!
//! - [`Tick`] counts scheduler iterations.  It is the unit the tick loop
//!   reasons about (first tick, stop after N ticks, observer callbacks).
//! - A [`Clock`] supplies wall-clock timestamps for samples and the
//!   environment model, and performs the wait between ticks.
//!
//! A [`StopHandle`] cuts a wait short: [`Clock::wait_unless_stopped`] returns
//! as soon as the handle is stopped, so a real-time run does not sit out the
//! rest of its interval after a stop request.
//!
//! Production runs use [`SystemClock`].  Tests use [`VirtualClock`], whose
//! `wait` advances virtual time instantly, so a 10,000-tick run at a 1 s
//! interval covers ~2.8 simulated hours in milliseconds of real time.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute scheduler tick counter.  Tick 0 is the immediate first tick.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of wall-clock time and of the inter-tick delay.
///
/// `Send` so a scheduler can be moved onto its own thread.
pub trait Clock: Send {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;

    /// Block (or pretend to) until `period` has elapsed.
    fn wait(&mut self, period: Duration);

    /// Like [`wait`](Self::wait), but return early once `stop` is stopped.
    /// Does not wait at all if it already is.
    fn wait_unless_stopped(&mut self, period: Duration, stop: &StopHandle) {
        if !stop.is_stopped() {
            self.wait(period);
        }
    }
}

// ── Stop handle ───────────────────────────────────────────────────────────────

/// Cloneable, thread-safe stop request.
///
/// Stopping wakes every thread parked in [`StopHandle::sleep`].
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<(Mutex<bool>, Condvar)>);

impl StopHandle {
    pub fn stop(&self) {
        let (flag, wake) = &*self.0;
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        wake.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        *self.0.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Park the calling thread for up to `period`.  Returns `true` if the
    /// handle was stopped before the period ran out.
    pub fn sleep(&self, period: Duration) -> bool {
        let (flag, wake) = &*self.0;
        let guard = flag.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = wake
            .wait_timeout_while(guard, period, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

/// Real time: `Utc::now()` and a sleeping thread.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn wait(&mut self, period: Duration) {
        std::thread::sleep(period);
    }

    fn wait_unless_stopped(&mut self, period: Duration, stop: &StopHandle) {
        stop.sleep(period);
    }
}

/// Deterministic clock that only moves when told to.
///
/// `wait(period)` advances the virtual time by exactly `period` and returns
/// immediately.
#[derive(Clone, Debug)]
pub struct VirtualClock {
    now: DateTime<Utc>,
}

impl VirtualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: start }
    }

    /// Start at a Unix timestamp (seconds).  Out-of-range values fall back
    /// to the Unix epoch.
    pub fn from_unix_secs(secs: i64) -> Self {
        Self::new(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }

    /// Move virtual time forward by `period`.
    pub fn advance(&mut self, period: Duration) {
        let delta = TimeDelta::from_std(period).unwrap_or(TimeDelta::MAX);
        self.now = self.now.checked_add_signed(delta).unwrap_or(self.now);
    }

    /// Jump to an arbitrary instant, including one in the past.
    pub fn set(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }
}

impl Clock for VirtualClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn wait(&mut self, period: Duration) {
        self.advance(period);
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn wait(&mut self, period: Duration) {
        (**self).wait(period)
    }

    fn wait_unless_stopped(&mut self, period: Duration, stop: &StopHandle) {
        (**self).wait_unless_stopped(period, stop)
    }
}
