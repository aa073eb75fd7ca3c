//! Integration tests for direct messages and their synthetic replies.
//!
//! Verifies:
//! 1. A direct message and its reply share one thread keyed by the peer.
//! 2. Every direct message gets exactly one reply after the canonical delay.
//! 3. Replies still arrive after the user switches away.
//! 4. Blank messages are rejected explicitly and transmit nothing.

use std::time::Duration;

use mockchat::app::{App, RenderQueue, ViewEvent};
use mockchat::chat::{ChatClient, ChatError};
use mockchat_proto::{ChannelRef, Identity, ValidationError};
use mockchat_relay::clock::ManualClock;
use mockchat_relay::config::SimulationConfig;
use mockchat_relay::responder::ScriptedRandom;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Client = ChatClient<ManualClock, ScriptedRandom>;

/// A client already joined as `local`, with the welcome drained.
fn joined_client(local: &str) -> (Client, ManualClock, RenderQueue) {
    let clock = ManualClock::new();
    let mut client = ChatClient::new(
        &SimulationConfig::default(),
        clock.clone(),
        ScriptedRandom::default(),
    );
    let mut view = RenderQueue::default();
    client.join(local).unwrap();
    clock.advance(Duration::from_millis(100));
    client.pump(&mut view).unwrap();
    view.take();
    (client, clock, view)
}

fn id(name: &str) -> Identity {
    Identity::parse(name).unwrap()
}

fn dm(peer: &str) -> ChannelRef {
    ChannelRef::Direct(id(peer))
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[test]
fn message_and_reply_share_the_peer_thread() {
    let (mut client, clock, mut view) = joined_client("alice");

    client.send("hi", dm("bob")).unwrap();
    clock.advance(Duration::from_millis(100));
    client.pump(&mut view).unwrap();
    clock.advance(Duration::from_millis(1500));
    client.pump(&mut view).unwrap();

    let stored: Vec<_> = view.messages().cloned().collect();
    assert_eq!(stored.len(), 2);

    let (sent, reply) = (&stored[0], &stored[1]);
    assert_eq!(sent.message.sender, id("alice"));
    assert_eq!(sent.message.channel, dm("bob"));
    assert_eq!(sent.storage_channel, dm("bob"));

    assert_eq!(reply.message.sender, id("bob"));
    assert_eq!(reply.message.channel, dm("alice"));
    assert_eq!(reply.message.text, "Copy that. Data received.");
    assert_eq!(reply.storage_channel, dm("bob"));

    assert_eq!(client.messages_for(&dm("bob")).len(), 2);
    assert!(client.messages_for(&dm("alice")).is_empty());
}

#[test]
fn every_direct_message_gets_exactly_one_reply() {
    let (mut client, clock, mut view) = joined_client("alice");

    for text in ["one", "two", "three"] {
        client.send(text, dm("bob")).unwrap();
    }
    clock.advance(Duration::from_secs(10));
    client.pump(&mut view).unwrap();
    assert_eq!(client.next_deadline(), None);

    let thread = client.messages_for(&dm("bob"));
    let replies = thread
        .iter()
        .filter(|stored| stored.message.sender == id("bob"))
        .count();
    assert_eq!(thread.len(), 6);
    assert_eq!(replies, 3);
}

#[test]
fn reply_arrives_after_canonical_delay() {
    let (mut client, clock, mut view) = joined_client("alice");

    client.send("ping", dm("bob")).unwrap();
    clock.advance(Duration::from_millis(100));
    client.pump(&mut view).unwrap();
    assert_eq!(view.take().len(), 1);

    clock.advance(Duration::from_millis(1499));
    assert_eq!(client.pump(&mut view).unwrap(), 0);

    clock.advance(Duration::from_millis(1));
    assert_eq!(client.pump(&mut view).unwrap(), 1);
}

#[test]
fn threads_with_different_peers_stay_apart() {
    let (mut client, clock, mut view) = joined_client("alice");

    client.send("to bob", dm("bob")).unwrap();
    client.send("to carol", dm("carol")).unwrap();
    clock.advance(Duration::from_secs(2));
    client.pump(&mut view).unwrap();

    let bob: Vec<_> = client
        .messages_for(&dm("bob"))
        .iter()
        .map(|s| s.message.text.clone())
        .collect();
    assert_eq!(bob, vec!["to bob", "Copy that. Data received."]);
    assert_eq!(client.messages_for(&dm("carol")).len(), 2);
}

// ---------------------------------------------------------------------------
// Channel switching
// ---------------------------------------------------------------------------

#[test]
fn reply_lands_in_thread_after_switching_away() {
    let (mut client, clock, mut view) = joined_client("alice");

    client.switch_channel(dm("bob"));
    client.send_current("hi").unwrap();
    clock.advance(Duration::from_millis(100));
    client.pump(&mut view).unwrap();

    client.switch_channel(ChannelRef::Global);
    clock.advance(Duration::from_millis(1500));
    client.pump(&mut view).unwrap();

    let events = view.take();
    let ViewEvent::Message(reply) = events.last().unwrap() else {
        panic!("expected a message");
    };
    assert_eq!(reply.storage_channel, dm("bob"));
    assert_eq!(client.session().current_channel(), &ChannelRef::Global);

    let thread = client.switch_channel(dm("bob"));
    assert_eq!(thread.len(), 2);
}

#[test]
fn off_screen_reply_is_flagged_unread_in_the_ui() {
    let clock = ManualClock::new();
    let client = ChatClient::new(
        &SimulationConfig::default(),
        clock.clone(),
        ScriptedRandom::default(),
    );
    let mut app = App::new(client);

    app.submit_line("alice");
    app.submit_line("/dm bob");
    app.submit_line("hi");
    app.submit_line("/global");
    clock.advance(Duration::from_millis(1600));
    app.tick();

    assert_eq!(app.header().title, "GLOBAL_NET");
    assert_eq!(app.unread_count(&dm("bob")), 2);
    assert!(app.channels().contains(&dm("bob")));

    app.open(dm("bob"));
    assert_eq!(app.header().title, "LINK: BOB");
    assert_eq!(app.unread_count(&dm("bob")), 0);
    let authors: Vec<_> = app.current_lines().into_iter().map(|l| l.author).collect();
    assert_eq!(authors, vec!["YOU", "bob"]);
}

#[test]
fn re_rendering_a_channel_is_idempotent() {
    let (mut client, clock, mut view) = joined_client("alice");
    client.send("hi", dm("bob")).unwrap();
    clock.advance(Duration::from_secs(2));
    client.pump(&mut view).unwrap();

    let first: Vec<_> = client.switch_channel(dm("bob")).into_iter().cloned().collect();
    let second: Vec<_> = client.switch_channel(dm("bob")).into_iter().cloned().collect();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn blank_message_is_rejected_and_not_transmitted() {
    let (mut client, clock, mut view) = joined_client("alice");

    let err = client.send("   ", dm("bob")).unwrap_err();
    assert!(matches!(
        err,
        ChatError::Validation(ValidationError::EmptyMessage)
    ));

    clock.advance(Duration::from_secs(5));
    assert_eq!(client.pump(&mut view).unwrap(), 0);
}

#[test]
fn message_text_is_trimmed() {
    let (mut client, clock, mut view) = joined_client("alice");
    client.send("  hello  ", ChannelRef::Global).unwrap();
    clock.advance(Duration::from_millis(100));
    client.pump(&mut view).unwrap();

    let echoed = view.messages().next().unwrap();
    assert_eq!(echoed.message.text, "hello");
}
