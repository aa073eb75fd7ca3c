//! Chat application layer for `MockChat`.
//!
//! Contains the [`ChatClient`], the UI-facing controller. It owns the
//! [`Session`], the simulated relay, and the [`ConversationStore`]. Commands
//! (`join`, `send`) go out to the relay and come back after simulated
//! latency; [`ChatClient::pump`] routes whatever has arrived, archives it,
//! and notifies the [`ChatView`].

pub mod history;
pub mod router;
pub mod session;

use std::time::Duration;

use tokio::sync::mpsc;

use mockchat_proto::event::{ClientEvent, EventName, OutboundMessage, ServerEvent};
use mockchat_proto::message::normalize_text;
use mockchat_proto::{ChannelRef, Identity, StoredMessage, ValidationError};
use mockchat_relay::clock::Clock;
use mockchat_relay::config::SimulationConfig;
use mockchat_relay::responder::RandomSource;
use mockchat_relay::{RelayError, SimulatedRelay};

use history::{ConversationStore, InMemoryStore};
use router::ChannelRouter;
use session::Session;

/// Errors returned by [`ChatClient`] commands.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// User input failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A message was sent before joining.
    #[error("not joined: pick an identity first")]
    NotJoined,

    /// `join` was called while already joined.
    #[error("already joined as {0}")]
    AlreadyJoined(Identity),

    /// The relay failed while dispatching events.
    #[error("relay error: {0}")]
    Relay(#[from] RelayError),
}

/// Rendering callbacks the UI layer implements.
pub trait ChatView {
    /// The roster of remote participants changed.
    fn on_roster_changed(&mut self, roster: &[Identity]);

    /// A message was received and archived.
    ///
    /// Fires for every message, whichever channel is on screen; the view
    /// filters against the session's current channel when rendering.
    fn on_message(&mut self, message: &StoredMessage);
}

/// UI-facing controller over a simulated relay.
pub struct ChatClient<C, R, S = InMemoryStore> {
    relay: SimulatedRelay<C, R>,
    inbox: mpsc::UnboundedReceiver<ServerEvent>,
    session: Session,
    store: S,
    roster: Vec<Identity>,
}

impl<C: Clock, R: RandomSource> ChatClient<C, R, InMemoryStore> {
    /// Creates a client with an in-memory conversation store.
    pub fn new(config: &SimulationConfig, clock: C, random: R) -> Self {
        Self::with_store(config, clock, random, InMemoryStore::new())
    }
}

impl<C: Clock, R: RandomSource, S: ConversationStore> ChatClient<C, R, S> {
    /// Creates a client archiving into `store`.
    pub fn with_store(config: &SimulationConfig, clock: C, random: R, store: S) -> Self {
        let mut relay = SimulatedRelay::new(config, clock, random);
        let (inbox_tx, inbox) = mpsc::unbounded_channel();
        for name in [EventName::RosterChanged, EventName::MessageReceived] {
            let tx = inbox_tx.clone();
            relay.on(name, move |event| {
                tx.send(event.clone())
                    .map_err(|_| "client inbox closed".into())
            });
        }

        Self {
            relay,
            inbox,
            session: Session::default(),
            store,
            roster: Vec::new(),
        }
    }

    /// Join the chat as `raw`, trimmed.
    ///
    /// The roster and welcome announcement arrive after network latency.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::AlreadyJoined`] if a session is active,
    /// [`ValidationError::IdentityRequired`] if `raw` is blank, or
    /// [`ValidationError::ReservedIdentity`] for `global` and names
    /// starting with `/`.
    pub fn join(&mut self, raw: &str) -> Result<Identity, ChatError> {
        if let Some(current) = self.session.identity() {
            return Err(ChatError::AlreadyJoined(current.clone()));
        }
        let identity = Identity::parse(raw)?;

        self.session.sign_in(identity.clone());
        let arrives = self.relay.emit(ClientEvent::Join(identity.clone()));
        tracing::info!(identity = %identity, ?arrives, "join transmitted");
        Ok(identity)
    }

    /// Send `text`, trimmed, to `channel`.
    ///
    /// The echo and any synthetic reply arrive later through
    /// [`pump`](Self::pump).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyMessage`] for blank text, or
    /// [`ChatError::NotJoined`] before [`join`](Self::join).
    pub fn send(&mut self, text: &str, channel: ChannelRef) -> Result<(), ChatError> {
        let text = normalize_text(text)?;
        let sender = self.session.identity().cloned().ok_or(ChatError::NotJoined)?;

        tracing::debug!(sender = %sender, channel = %channel, "transmitting message");
        let arrives = self.relay.emit(ClientEvent::SendMessage(OutboundMessage {
            sender,
            text,
            channel,
        }));
        tracing::trace!(?arrives, "message in flight");
        Ok(())
    }

    /// Send `text` to the channel currently on screen.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub fn send_current(&mut self, text: &str) -> Result<(), ChatError> {
        let channel = self.session.current_channel().clone();
        self.send(text, channel)
    }

    /// Put `channel` on screen and return its thread.
    pub fn switch_channel(&mut self, channel: ChannelRef) -> Vec<&StoredMessage> {
        tracing::debug!(channel = %channel, "channel selected");
        self.session.select(channel);
        self.store.query_by_channel(self.session.current_channel())
    }

    /// Messages archived under `channel`, oldest first.
    pub fn messages_for(&self, channel: &ChannelRef) -> Vec<&StoredMessage> {
        self.store.query_by_channel(channel)
    }

    /// The thread currently on screen.
    pub fn current_messages(&self) -> Vec<&StoredMessage> {
        self.store.query_by_channel(self.session.current_channel())
    }

    /// Run every simulated effect that is due, then route, archive and
    /// render what arrived.
    ///
    /// Returns the number of events handed to `view`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Relay`] if event dispatch failed. Events that
    /// arrived before the failure are still delivered to `view`.
    pub fn pump(&mut self, view: &mut impl ChatView) -> Result<usize, ChatError> {
        let polled = self.relay.poll();
        let delivered = self.drain(view);
        polled?;
        Ok(delivered)
    }

    /// When the next simulated effect is due, relative to the clock's start.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.relay.next_deadline()
    }

    /// Time left until the next simulated effect, if one is pending.
    #[must_use]
    pub fn time_to_next_deadline(&self) -> Option<Duration> {
        let now = self.relay.clock().now();
        self.next_deadline().map(|due| due.saturating_sub(now))
    }

    /// The local session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The latest roster snapshot received.
    #[must_use]
    pub fn roster(&self) -> &[Identity] {
        &self.roster
    }

    /// The conversation log.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// End the session: forget the identity, the log and every pending
    /// simulated effect.
    pub fn logout(&mut self) {
        tracing::info!(identity = ?self.session.identity(), "logging out");
        self.session.reset();
        self.store.clear();
        self.roster.clear();
        self.relay.reset();
        while self.inbox.try_recv().is_ok() {}
    }

    fn drain(&mut self, view: &mut impl ChatView) -> usize {
        let mut delivered = 0;
        while let Ok(event) = self.inbox.try_recv() {
            match event {
                ServerEvent::RosterChanged(roster) => {
                    self.roster = roster;
                    view.on_roster_changed(&self.roster);
                }
                ServerEvent::MessageReceived(message) => {
                    let stored = ChannelRouter::new(self.session.identity()).ingest(message);
                    view.on_message(self.store.append(stored));
                }
            }
            delivered += 1;
        }
        delivered
    }
}
