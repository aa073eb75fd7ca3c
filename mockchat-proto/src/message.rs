//! Chat message types.
//!
//! A [`Message`] is what the relay emits: one transmitted utterance,
//! immutable once created. The client archives it as a [`StoredMessage`],
//! which adds the thread key resolved at receipt time.

use crate::channel::ChannelRef;
use crate::identity::Identity;

/// Errors raised when validating user-supplied input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The identity was empty after trimming.
    #[error("identity required")]
    IdentityRequired,

    /// The identity collides with a channel name or command syntax.
    #[error("identity is reserved")]
    ReservedIdentity,

    /// The message text was empty after trimming.
    #[error("message text is empty")]
    EmptyMessage,
}

/// Trim message text, rejecting blank input.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyMessage`] if nothing is left after
/// trimming.
pub fn normalize_text(raw: &str) -> Result<String, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    Ok(text.to_string())
}

/// A single transmitted utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Who sent it.
    pub sender: Identity,
    /// Message body.
    pub text: String,
    /// Where it was addressed.
    pub channel: ChannelRef,
    /// Local wall-clock time at which the relay emitted it.
    pub timestamp: String,
}

impl Message {
    /// Whether this is a relay announcement rather than a participant message.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.sender.is_system()
    }
}

/// A [`Message`] archived under its resolved thread key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    /// The message as received.
    pub message: Message,
    /// Thread key the message is archived under.
    pub storage_channel: ChannelRef,
}

impl StoredMessage {
    /// Pair a received message with its thread key.
    #[must_use]
    pub const fn new(message: Message, storage_channel: ChannelRef) -> Self {
        Self {
            message,
            storage_channel,
        }
    }
}
