//! Thread-key resolution.
//!
//! Every message is archived under exactly one storage channel:
//! - broadcasts under `global`;
//! - direct messages under the *other* participant, whichever direction
//!   the message travelled.
//!
//! An outbound direct message is addressed to the peer, so its channel is
//! already the peer. An inbound reply is addressed to the local user, so
//! its channel field is ignored and the sender is used instead. Both
//! directions of a conversation with P therefore land under P.

use mockchat_proto::{ChannelRef, Identity, Message, StoredMessage};

/// Resolves storage channels relative to the local participant.
#[derive(Debug, Clone, Copy)]
pub struct ChannelRouter<'a> {
    local: Option<&'a Identity>,
}

impl<'a> ChannelRouter<'a> {
    /// Route relative to `local`. Before joining there is no local
    /// identity and every direct message counts as inbound.
    #[must_use]
    pub const fn new(local: Option<&'a Identity>) -> Self {
        Self { local }
    }

    /// The thread key `message` is archived under.
    #[must_use]
    pub fn resolve(&self, message: &Message) -> ChannelRef {
        match &message.channel {
            ChannelRef::Global => ChannelRef::Global,
            ChannelRef::Direct(addressed) if self.local == Some(&message.sender) => {
                ChannelRef::Direct(addressed.clone())
            }
            ChannelRef::Direct(_) => ChannelRef::Direct(message.sender.clone()),
        }
    }

    /// Attach the resolved thread key to a received message.
    #[must_use]
    pub fn ingest(&self, message: Message) -> StoredMessage {
        let storage_channel = self.resolve(&message);
        tracing::trace!(
            sender = %message.sender,
            channel = %message.channel,
            storage = %storage_channel,
            "message routed"
        );
        StoredMessage::new(message, storage_channel)
    }
}
