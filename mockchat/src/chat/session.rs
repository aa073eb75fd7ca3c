//! Local participant state.

use mockchat_proto::{ChannelRef, Identity};

/// Who the local user is and which channel they are looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
    current_channel: ChannelRef,
}

impl Session {
    /// The local identity, once joined.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Whether the local user has joined.
    #[must_use]
    pub const fn is_joined(&self) -> bool {
        self.identity.is_some()
    }

    /// The channel currently displayed.
    #[must_use]
    pub const fn current_channel(&self) -> &ChannelRef {
        &self.current_channel
    }

    /// Record the local identity.
    pub fn sign_in(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Change the displayed channel.
    pub fn select(&mut self, channel: ChannelRef) {
        self.current_channel = channel;
    }

    /// Forget the identity and go back to the broadcast channel.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
