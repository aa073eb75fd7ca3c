//! Channel references: the broadcast channel or a direct-message peer.

use std::fmt;

use crate::identity::Identity;
use crate::message::ValidationError;

/// Wire name of the broadcast channel.
pub const GLOBAL_CHANNEL: &str = "global";

/// Where a message is addressed, or under which thread it is archived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ChannelRef {
    /// The shared broadcast conversation.
    #[default]
    Global,
    /// A two-party conversation with the given peer.
    Direct(Identity),
}

impl ChannelRef {
    /// Parse a channel name typed by the user.
    ///
    /// The exact string `global` selects the broadcast channel, anything
    /// else names a direct-message peer.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IdentityRequired`] for a blank name.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed == GLOBAL_CHANNEL {
            return Ok(Self::Global);
        }
        Identity::parse(trimmed).map(Self::Direct)
    }

    /// Whether this is the broadcast channel.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    /// The peer of a direct channel, `None` for broadcast.
    #[must_use]
    pub const fn peer(&self) -> Option<&Identity> {
        match self {
            Self::Global => None,
            Self::Direct(peer) => Some(peer),
        }
    }

    /// Return the string representation of this channel.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Global => GLOBAL_CHANNEL,
            Self::Direct(peer) => peer.as_str(),
        }
    }
}

impl From<Identity> for ChannelRef {
    fn from(peer: Identity) -> Self {
        Self::Direct(peer)
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
