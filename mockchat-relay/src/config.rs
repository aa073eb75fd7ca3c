//! Resolved settings of the simulated relay.
//!
//! File and CLI layering happens in the client crate; this is the
//! fully-populated result the relay is built from.

use std::time::Duration;

use mockchat_proto::Identity;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::network::DEFAULT_LATENCY;
use crate::responder::ReplyPolicy;

/// Default `chrono` format for message timestamps.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// Fully resolved simulation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// One-way latency applied to every client command.
    pub network_latency: Duration,
    /// Reply policy of the synthetic peers.
    pub replies: ReplyPolicy,
    /// Synthetic peers listed in the roster. Empty unless configured.
    pub peers: Vec<Identity>,
    /// Seed for a deterministic random source; thread RNG when `None`.
    pub seed: Option<u64>,
    /// `chrono` format string for message timestamps.
    pub timestamp_format: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            network_latency: DEFAULT_LATENCY,
            replies: ReplyPolicy::default(),
            peers: Vec::new(),
            seed: None,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl SimulationConfig {
    /// Build the random source for the reply policy.
    ///
    /// Seeded runs are reproducible; unseeded runs draw their seed from the
    /// thread RNG.
    #[must_use]
    pub fn random_source(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}
