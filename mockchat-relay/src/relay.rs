//! The simulated relay: a chat server that lives inside the client process.
//!
//! Client commands go in through [`SimulatedRelay::emit`] and take effect
//! one network latency later. Effects come out as [`ServerEvent`]s published
//! to whatever handlers were registered with [`SimulatedRelay::on`]. Nothing
//! happens between calls to [`SimulatedRelay::poll`]; the caller decides when
//! time has passed.

use std::fmt::Write as _;
use std::time::Duration;

use mockchat_proto::event::{ClientEvent, EventName, OutboundMessage, ServerEvent};
use mockchat_proto::{ChannelRef, Identity, Message};

use crate::bus::{BusError, EventBus, HandlerResult};
use crate::clock::Clock;
use crate::config::{DEFAULT_TIMESTAMP_FORMAT, SimulationConfig};
use crate::network::NetworkSimulator;
use crate::presence::PresenceDirectory;
use crate::responder::{PendingReply, RandomSource, ResponderEngine};
use crate::scheduler::Scheduler;

/// Errors surfaced while the relay processes due work.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A subscriber failed while an event was being published.
    #[error("event dispatch failed: {0}")]
    Dispatch(#[from] BusError),
}

/// Work waiting in the relay's queue.
#[derive(Debug)]
enum RelayTask {
    /// A client command reaching the relay after network latency.
    Arrive(ClientEvent),
    /// A synthetic reply whose delay has elapsed.
    Deliver(PendingReply),
}

/// In-process stand-in for a chat server.
pub struct SimulatedRelay<C, R> {
    clock: C,
    network: NetworkSimulator,
    scheduler: Scheduler<RelayTask>,
    presence: PresenceDirectory,
    responder: ResponderEngine<R>,
    bus: EventBus<EventName, ServerEvent>,
    timestamp_format: String,
}

impl<C: Clock, R: RandomSource> SimulatedRelay<C, R> {
    /// Build a relay from resolved configuration.
    pub fn new(config: &SimulationConfig, clock: C, random: R) -> Self {
        Self {
            clock,
            network: NetworkSimulator::new(config.network_latency),
            scheduler: Scheduler::new(),
            presence: PresenceDirectory::with_peers(config.peers.iter().cloned()),
            responder: ResponderEngine::new(config.replies.clone(), random),
            bus: EventBus::new(),
            timestamp_format: config.timestamp_format.clone(),
        }
    }

    /// Subscribe to events published under `name`.
    pub fn on<F>(&mut self, name: EventName, handler: F)
    where
        F: FnMut(&ServerEvent) -> HandlerResult + Send + 'static,
    {
        self.bus.subscribe(name, handler);
    }

    /// Transmit a client command. It is handled once the network latency
    /// has elapsed.
    ///
    /// Returns the time at which the command reaches the relay.
    pub fn emit(&mut self, event: ClientEvent) -> Duration {
        let now = self.clock.now();
        self.network.transmit(&mut self.scheduler, now, RelayTask::Arrive(event))
    }

    /// Run every task that is due at the clock's current time.
    ///
    /// Tasks scheduled while polling are measured from the due time of the
    /// task that scheduled them, and run in the same call if they are
    /// already due. Returns the number of tasks run.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Dispatch`] if a subscriber fails. The failing
    /// task is consumed; later tasks stay queued for the next poll.
    pub fn poll(&mut self) -> Result<usize, RelayError> {
        let now = self.clock.now();
        let mut ran = 0;
        while let Some((due, task)) = self.scheduler.pop_due(now) {
            self.run(due, task)?;
            ran += 1;
        }
        Ok(ran)
    }

    /// When the next queued task becomes due.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.scheduler.len()
    }

    /// The roster of synthetic peers.
    #[must_use]
    pub const fn roster(&self) -> &PresenceDirectory {
        &self.presence
    }

    /// The relay's time source.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Drop all queued work. Subscribers and the roster are kept.
    pub fn reset(&mut self) {
        tracing::debug!(dropped = self.scheduler.len(), "relay queue reset");
        self.scheduler.clear();
    }

    fn run(&mut self, at: Duration, task: RelayTask) -> Result<(), RelayError> {
        match task {
            RelayTask::Arrive(ClientEvent::Join(identity)) => self.handle_join(&identity),
            RelayTask::Arrive(ClientEvent::SendMessage(outbound)) => {
                self.handle_send(at, outbound)
            }
            RelayTask::Deliver(reply) => {
                tracing::debug!(
                    sender = %reply.sender,
                    channel = %reply.channel,
                    "delivering synthetic reply"
                );
                let message = Message {
                    sender: reply.sender,
                    text: reply.text,
                    channel: reply.channel,
                    timestamp: self.stamp(),
                };
                self.trigger(&ServerEvent::MessageReceived(message))
            }
        }
    }

    fn handle_join(&mut self, identity: &Identity) -> Result<(), RelayError> {
        tracing::info!(identity = %identity, roster = self.presence.len(), "participant joined");
        self.trigger(&ServerEvent::RosterChanged(self.presence.snapshot()))?;

        let welcome = Message {
            sender: Identity::system(),
            text: format!("User {identity} has connected to the neural net."),
            channel: ChannelRef::Global,
            timestamp: self.stamp(),
        };
        self.trigger(&ServerEvent::MessageReceived(welcome))
    }

    fn handle_send(&mut self, at: Duration, outbound: OutboundMessage) -> Result<(), RelayError> {
        let echoed = Message {
            sender: outbound.sender,
            text: outbound.text,
            channel: outbound.channel,
            timestamp: self.stamp(),
        };
        self.trigger(&ServerEvent::MessageReceived(echoed.clone()))?;

        if let Some(reply) = self.responder.decide(&echoed, &self.presence) {
            let due = self.scheduler.schedule(at, reply.delay, RelayTask::Deliver(reply));
            tracing::debug!(?due, "synthetic reply scheduled");
        }
        Ok(())
    }

    fn trigger(&mut self, event: &ServerEvent) -> Result<(), RelayError> {
        self.bus.publish(event.name(), event)?;
        Ok(())
    }

    fn stamp(&self) -> String {
        let now = self.clock.local_time();
        let mut timestamp = String::new();
        if write!(timestamp, "{}", now.format(&self.timestamp_format)).is_ok() {
            return timestamp;
        }
        tracing::warn!(
            format = %self.timestamp_format,
            "invalid timestamp format, using default"
        );
        now.format(DEFAULT_TIMESTAMP_FORMAT).to_string()
    }
}
