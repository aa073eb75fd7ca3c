//! Local conversation log.
//!
//! Defines the [`ConversationStore`] trait: an append-only, ordered log of
//! every message seen this session, projected per thread for rendering.
//! [`InMemoryStore`] is the only implementation; nothing outlives the
//! session.

use mockchat_proto::{ChannelRef, StoredMessage};

/// Append-only message log, queryable by thread key.
pub trait ConversationStore {
    /// Add a message at the end of the log and return it.
    fn append(&mut self, message: StoredMessage) -> &StoredMessage;

    /// Messages archived under `channel`, in the order they were appended.
    fn query_by_channel(&self, channel: &ChannelRef) -> Vec<&StoredMessage>;

    /// Total number of messages.
    fn len(&self) -> usize;

    /// Whether the log is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every message. Only used when the session ends.
    fn clear(&mut self);
}

/// Vector-backed [`ConversationStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    messages: Vec<StoredMessage>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }
}

impl ConversationStore for InMemoryStore {
    fn append(&mut self, message: StoredMessage) -> &StoredMessage {
        let index = self.messages.len();
        self.messages.push(message);
        &self.messages[index]
    }

    fn query_by_channel(&self, channel: &ChannelRef) -> Vec<&StoredMessage> {
        self.messages
            .iter()
            .filter(|stored| stored.storage_channel == *channel)
            .collect()
    }

    fn len(&self) -> usize {
        self.messages.len()
    }

    fn clear(&mut self) {
        self.messages.clear();
    }
}
