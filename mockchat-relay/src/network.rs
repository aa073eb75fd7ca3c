//! Artificial one-way latency between client and relay.

use std::time::Duration;

use crate::scheduler::Scheduler;

/// Default one-way latency applied to every client command.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(100);

/// Delays each transmitted payload by a fixed latency.
///
/// The latency is a constant; payload size and load play no part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkSimulator {
    latency: Duration,
}

impl NetworkSimulator {
    /// Create a simulator with the given one-way latency.
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// The configured one-way latency.
    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }

    /// Queue `payload` to arrive one latency after `now`.
    ///
    /// Never blocks; returns the time at which the payload arrives.
    pub fn transmit<T>(&self, scheduler: &mut Scheduler<T>, now: Duration, payload: T) -> Duration {
        let arrives = scheduler.schedule(now, self.latency, payload);
        tracing::trace!(?now, ?arrives, "payload in flight");
        arrives
    }
}

impl Default for NetworkSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}
