//! Participant identities.

use std::fmt;

use serde::Deserialize;

use crate::channel::GLOBAL_CHANNEL;
use crate::message::ValidationError;

/// Reserved sender name for relay announcements.
pub const SYSTEM_SENDER: &str = "SYSTEM";

/// Name of a chat participant, either the local user or a synthetic peer.
///
/// An `Identity` is never empty: the only way to build one from user input
/// is [`Identity::parse`], which trims surrounding whitespace and rejects
/// blank names. Names that would read back as the broadcast channel or as
/// a slash command are rejected too, so a direct channel always round-trips
/// through its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct Identity(String);

impl Identity {
    /// Normalize and validate a raw identity string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IdentityRequired`] if the input is empty
    /// after trimming, or [`ValidationError::ReservedIdentity`] for
    /// `global` and names starting with `/`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ValidationError::IdentityRequired);
        }
        if name == GLOBAL_CHANNEL || name.starts_with('/') {
            return Err(ValidationError::ReservedIdentity);
        }
        Ok(Self(name.to_string()))
    }

    /// The identity used for relay announcements.
    #[must_use]
    pub fn system() -> Self {
        Self(SYSTEM_SENDER.to_string())
    }

    /// Whether this is the reserved system sender.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.0 == SYSTEM_SENDER
    }

    /// Return the string representation of this identity.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
