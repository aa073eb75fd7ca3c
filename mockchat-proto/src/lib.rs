//! Shared data model for `MockChat`: identities, channels, messages and the
//! events exchanged between the client and the simulated relay.

pub mod channel;
pub mod event;
pub mod identity;
pub mod message;

pub use channel::ChannelRef;
pub use identity::Identity;
pub use message::{Message, StoredMessage, ValidationError};
