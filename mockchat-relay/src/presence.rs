//! Roster of remote participants.
//!
//! The directory only ever holds *other* participants. The local user is
//! never added, and entries are never removed. Membership is the only
//! presence information: synthetic peers are always online.

use mockchat_proto::Identity;

/// Insertion-ordered set of remote identities.
#[derive(Debug, Clone, Default)]
pub struct PresenceDirectory {
    entries: Vec<Identity>,
}

impl PresenceDirectory {
    /// Create an empty directory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a directory pre-populated with synthetic peers.
    ///
    /// Duplicates are dropped, keeping the first occurrence.
    #[must_use]
    pub fn with_peers<I>(peers: I) -> Self
    where
        I: IntoIterator<Item = Identity>,
    {
        let mut directory = Self::new();
        for peer in peers {
            directory.insert(peer);
        }
        directory
    }

    /// Add a remote participant.
    ///
    /// Returns `false` if they were already listed.
    pub fn insert(&mut self, identity: Identity) -> bool {
        if self.contains(&identity) {
            return false;
        }
        tracing::debug!(peer = %identity, "roster entry added");
        self.entries.push(identity);
        true
    }

    /// Whether `identity` is listed.
    #[must_use]
    pub fn contains(&self, identity: &Identity) -> bool {
        self.entries.contains(identity)
    }

    /// Participant at `index` in insertion order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Identity> {
        self.entries.get(index)
    }

    /// Ordered list of remote identities.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Identity> {
        self.entries.clone()
    }

    /// Number of listed participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
