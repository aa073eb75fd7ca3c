//! Property tests for channel names, thread-key resolution and store
//! ordering.

use mockchat::chat::history::{ConversationStore, InMemoryStore};
use mockchat::chat::router::ChannelRouter;
use mockchat_proto::{ChannelRef, Identity, Message, StoredMessage};
use proptest::prelude::*;

fn identity() -> impl Strategy<Value = Identity> {
    "[a-z][a-z0-9_]{0,11}".prop_filter_map("reserved name", |name| Identity::parse(&name).ok())
}

fn channel() -> impl Strategy<Value = ChannelRef> {
    prop_oneof![
        Just(ChannelRef::Global),
        identity().prop_map(ChannelRef::Direct),
    ]
}

fn message(sender: Identity, channel: ChannelRef, text: String) -> Message {
    Message {
        sender,
        text,
        channel,
        timestamp: "00:00:00".to_string(),
    }
}

proptest! {
    #[test]
    fn channel_names_round_trip(channel in channel()) {
        prop_assert_eq!(ChannelRef::parse(&channel.to_string()).unwrap(), channel);
    }

    #[test]
    fn typed_names_never_alias_the_broadcast_channel(raw in "[ a-z/]{0,10}") {
        if let Ok(identity) = Identity::parse(&raw) {
            prop_assert_eq!(
                ChannelRef::parse(identity.as_str()).unwrap(),
                ChannelRef::Direct(identity)
            );
        }
    }

    #[test]
    fn dm_and_reply_resolve_to_peer(local in identity(), peer in identity(), text in ".{1,40}") {
        prop_assume!(local != peer);
        let router = ChannelRouter::new(Some(&local));

        let outbound = message(local.clone(), ChannelRef::Direct(peer.clone()), text.clone());
        let reply = message(peer.clone(), ChannelRef::Direct(local.clone()), text);

        prop_assert_eq!(router.resolve(&outbound), ChannelRef::Direct(peer.clone()));
        prop_assert_eq!(router.resolve(&reply), ChannelRef::Direct(peer));
    }

    #[test]
    fn broadcast_always_resolves_to_global(local in identity(), sender in identity()) {
        let router = ChannelRouter::new(Some(&local));
        let msg = message(sender, ChannelRef::Global, "x".to_string());
        prop_assert_eq!(router.resolve(&msg), ChannelRef::Global);
    }

    #[test]
    fn inbound_dm_ignores_addressed_channel(
        local in identity(),
        sender in identity(),
        addressed in identity(),
    ) {
        prop_assume!(local != sender);
        let router = ChannelRouter::new(Some(&local));
        let msg = message(sender.clone(), ChannelRef::Direct(addressed), "x".to_string());
        prop_assert_eq!(router.resolve(&msg), ChannelRef::Direct(sender));
    }

    #[test]
    fn query_preserves_append_order(
        local in identity(),
        traffic in prop::collection::vec((identity(), channel()), 0..60),
        key in channel(),
    ) {
        let router = ChannelRouter::new(Some(&local));
        let mut store = InMemoryStore::new();
        let mut expected = Vec::new();

        for (seq, (sender, channel)) in traffic.into_iter().enumerate() {
            let stored: StoredMessage = router.ingest(message(sender, channel, seq.to_string()));
            if stored.storage_channel == key {
                expected.push(seq.to_string());
            }
            store.append(stored);
        }

        let first: Vec<String> = store
            .query_by_channel(&key)
            .iter()
            .map(|s| s.message.text.clone())
            .collect();
        let second: Vec<String> = store
            .query_by_channel(&key)
            .iter()
            .map(|s| s.message.text.clone())
            .collect();
        prop_assert_eq!(&first, &expected);
        prop_assert_eq!(first, second);
    }
}
