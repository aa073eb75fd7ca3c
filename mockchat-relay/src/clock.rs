//! Time sources for the simulation.
//!
//! The relay measures delays against [`Clock::now`], a monotonic offset
//! from the start of the simulation, and stamps messages with
//! [`Clock::local_time`]. Tests drive a [`ManualClock`] by hand.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, TimeDelta};
use parking_lot::Mutex;

/// Source of logical and wall-clock time.
pub trait Clock {
    /// Time elapsed since the simulation started.
    fn now(&self) -> Duration;

    /// Current local wall-clock time, used for message timestamps.
    fn local_time(&self) -> DateTime<Local>;
}

/// Real time, measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    /// Start a clock at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn local_time(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the relay.
#[derive(Debug, Clone)]
pub struct ManualClock {
    elapsed: Arc<Mutex<Duration>>,
    epoch: DateTime<Local>,
}

impl ManualClock {
    /// Start at zero elapsed time, with wall-clock time anchored to now.
    #[must_use]
    pub fn new() -> Self {
        Self::with_epoch(Local::now())
    }

    /// Start at zero elapsed time, with wall-clock time anchored to `epoch`.
    #[must_use]
    pub fn with_epoch(epoch: DateTime<Local>) -> Self {
        Self {
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
            epoch,
        }
    }

    /// Move time forward by `by`.
    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }

    /// Jump to an absolute elapsed time. Moving backwards is ignored.
    pub fn set(&self, to: Duration) {
        let mut elapsed = self.elapsed.lock();
        if to > *elapsed {
            *elapsed = to;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.elapsed.lock()
    }

    fn local_time(&self) -> DateTime<Local> {
        let offset = TimeDelta::from_std(self.now()).unwrap_or(TimeDelta::MAX);
        self.epoch
            .checked_add_signed(offset)
            .unwrap_or(self.epoch)
    }
}
