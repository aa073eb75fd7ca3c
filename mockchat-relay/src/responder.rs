//! Automatic reply policy.
//!
//! Every echoed message gets at most one synthetic reply:
//! - a direct message is always answered by the addressed peer with a fixed
//!   acknowledgement, sent back to the original sender;
//! - a broadcast is answered with some probability by a random roster entry
//!   with a random phrase, and never when the roster is empty.

use std::collections::VecDeque;
use std::time::Duration;

use mockchat_proto::{ChannelRef, Identity, Message};
use rand::Rng;
use rand::rngs::StdRng;

use crate::presence::PresenceDirectory;

/// Acknowledgement sent back for every direct message.
pub const DEFAULT_ACKNOWLEDGEMENT: &str = "Copy that. Data received.";

/// Phrases synthetic peers pick from when answering a broadcast.
pub const DEFAULT_PHRASES: [&str; 6] = [
    "Signal is weak in sector 7.",
    "Who is watching the watchers?",
    "Did you see the new protocol?",
    "System needs a reboot.",
    "ACK.",
    "Uploading...",
];

/// Source of randomness for reply decisions.
pub trait RandomSource {
    /// A uniform sample from `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// A uniform index into a collection of `len` items. `len` is never zero.
    fn next_index(&mut self, len: usize) -> usize;
}

impl RandomSource for StdRng {
    fn next_f64(&mut self) -> f64 {
        self.random()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Replays fixed sequences, for deterministic tests.
///
/// Once a sequence runs out, `next_f64` returns `0.0` and `next_index`
/// returns `0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    rolls: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl ScriptedRandom {
    /// Script the rolls and indices to hand out, in order.
    #[must_use]
    pub fn new(
        rolls: impl IntoIterator<Item = f64>,
        indices: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            indices: indices.into_iter().collect(),
        }
    }

    /// Rolls not yet handed out.
    #[must_use]
    pub fn remaining_rolls(&self) -> usize {
        self.rolls.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(0.0)
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.indices.pop_front().unwrap_or(0) % len.max(1)
    }
}

/// Tunables of the reply policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyPolicy {
    /// Chance that a broadcast gets a reply, in `[0, 1]`.
    pub broadcast_probability: f64,
    /// Delay before a broadcast reply.
    pub broadcast_delay: Duration,
    /// Delay before a direct-message reply.
    pub direct_delay: Duration,
    /// Text of every direct-message reply.
    pub acknowledgement: String,
    /// Phrases for broadcast replies.
    pub phrases: Vec<String>,
}

impl Default for ReplyPolicy {
    fn default() -> Self {
        Self {
            broadcast_probability: 0.3,
            broadcast_delay: Duration::from_millis(2000),
            direct_delay: Duration::from_millis(1500),
            acknowledgement: DEFAULT_ACKNOWLEDGEMENT.to_string(),
            phrases: DEFAULT_PHRASES.iter().map(ToString::to_string).collect(),
        }
    }
}

/// A synthetic reply waiting for its delay to elapse.
///
/// The timestamp is taken when the reply is delivered, not when it is
/// decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    /// How long after the triggering message the reply is delivered.
    pub delay: Duration,
    /// The synthetic peer answering.
    pub sender: Identity,
    /// Reply body.
    pub text: String,
    /// Where the reply is addressed.
    pub channel: ChannelRef,
}

/// Decides whether, when and from whom an echoed message gets a reply.
pub struct ResponderEngine<R> {
    policy: ReplyPolicy,
    random: R,
}

impl<R: RandomSource> ResponderEngine<R> {
    /// Create an engine with the given policy and random source.
    pub const fn new(policy: ReplyPolicy, random: R) -> Self {
        Self { policy, random }
    }

    /// The active policy.
    pub const fn policy(&self) -> &ReplyPolicy {
        &self.policy
    }

    /// Decide the reply to an echoed message, if any.
    pub fn decide(&mut self, echoed: &Message, roster: &PresenceDirectory) -> Option<PendingReply> {
        match &echoed.channel {
            ChannelRef::Direct(peer) => Some(PendingReply {
                delay: self.policy.direct_delay,
                sender: peer.clone(),
                text: self.policy.acknowledgement.clone(),
                channel: ChannelRef::Direct(echoed.sender.clone()),
            }),
            ChannelRef::Global => self.broadcast_reply(roster),
        }
    }

    fn broadcast_reply(&mut self, roster: &PresenceDirectory) -> Option<PendingReply> {
        if roster.is_empty() || self.policy.phrases.is_empty() {
            return None;
        }
        let roll = self.random.next_f64();
        if roll >= self.policy.broadcast_probability {
            tracing::trace!(roll, "broadcast left unanswered");
            return None;
        }

        let sender = roster.get(self.random.next_index(roster.len()))?.clone();
        let phrases = &self.policy.phrases;
        let text = phrases.get(self.random.next_index(phrases.len()))?.clone();
        Some(PendingReply {
            delay: self.policy.broadcast_delay,
            sender,
            text,
            channel: ChannelRef::Global,
        })
    }
}
