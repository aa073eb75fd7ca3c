//! Events exchanged between the client and the simulated relay.

use std::fmt;

use crate::channel::ChannelRef;
use crate::identity::Identity;
use crate::message::Message;

/// Payload of a send command, before the relay stamps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// The local participant.
    pub sender: Identity,
    /// Trimmed, non-empty body.
    pub text: String,
    /// Channel selected at send time.
    pub channel: ChannelRef,
}

/// Commands the client transmits to the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The local participant connects under this identity.
    Join(Identity),
    /// The local participant sends a message.
    SendMessage(OutboundMessage),
}

/// Name under which [`ServerEvent`]s are published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    /// The roster of remote participants changed.
    RosterChanged,
    /// A message was delivered.
    MessageReceived,
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RosterChanged => write!(f, "rosterChanged"),
            Self::MessageReceived => write!(f, "messageReceived"),
        }
    }
}

/// Effects the relay publishes back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Ordered snapshot of remote identities.
    RosterChanged(Vec<Identity>),
    /// A message was delivered.
    MessageReceived(Message),
}

impl ServerEvent {
    /// The name this event is published under.
    #[must_use]
    pub const fn name(&self) -> EventName {
        match self {
            Self::RosterChanged(_) => EventName::RosterChanged,
            Self::MessageReceived(_) => EventName::MessageReceived,
        }
    }
}
