//! Integration tests for joining the simulated chat.
//!
//! Verifies:
//! 1. Blank identities are rejected before anything is transmitted.
//! 2. A valid join produces a roster snapshot, then a SYSTEM announcement.
//! 3. Nothing reaches the view before the network latency has elapsed.
//! 4. The local user never appears in the roster.
//! 5. Names that would read back as a channel or command are refused.

use std::time::Duration;

use mockchat::app::{RenderQueue, ViewEvent};
use mockchat::chat::{ChatClient, ChatError};
use mockchat_proto::{ChannelRef, Identity, ValidationError};
use mockchat_relay::clock::ManualClock;
use mockchat_relay::config::SimulationConfig;
use mockchat_relay::responder::ScriptedRandom;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Client = ChatClient<ManualClock, ScriptedRandom>;

fn client_with(config: &SimulationConfig) -> (Client, ManualClock) {
    let clock = ManualClock::new();
    let client = ChatClient::new(config, clock.clone(), ScriptedRandom::default());
    (client, clock)
}

fn id(name: &str) -> Identity {
    Identity::parse(name).unwrap()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn empty_and_blank_identities_are_rejected() {
    let (mut client, _clock) = client_with(&SimulationConfig::default());

    for raw in ["", "   ", "\t\n"] {
        let err = client.join(raw).unwrap_err();
        assert!(
            matches!(err, ChatError::Validation(ValidationError::IdentityRequired)),
            "unexpected error for {raw:?}: {err}"
        );
    }
    assert!(!client.session().is_joined());
    assert_eq!(client.next_deadline(), None);
}

#[test]
fn reserved_identities_are_rejected() {
    let (mut client, _clock) = client_with(&SimulationConfig::default());

    for raw in ["global", " global ", "/quit"] {
        let err = client.join(raw).unwrap_err();
        assert!(
            matches!(err, ChatError::Validation(ValidationError::ReservedIdentity)),
            "unexpected error for {raw:?}: {err}"
        );
    }
    assert!(!client.session().is_joined());
    assert!(client.join("Global").is_ok());
}

#[test]
fn identity_is_trimmed() {
    let (mut client, _clock) = client_with(&SimulationConfig::default());
    let identity = client.join("  neo  ").unwrap();
    assert_eq!(identity.as_str(), "neo");
    assert_eq!(client.session().identity(), Some(&identity));
}

// ---------------------------------------------------------------------------
// Join effects
// ---------------------------------------------------------------------------

#[test]
fn join_emits_roster_then_system_announcement() {
    let (mut client, clock) = client_with(&SimulationConfig::default());
    let mut view = RenderQueue::default();

    client.join("neo").unwrap();
    clock.advance(Duration::from_millis(100));
    assert_eq!(client.pump(&mut view).unwrap(), 2);

    let events = view.take();
    assert_eq!(events[0], ViewEvent::Roster(Vec::new()));
    let ViewEvent::Message(welcome) = &events[1] else {
        panic!("expected the welcome message, got {:?}", events[1]);
    };
    assert!(welcome.message.is_system());
    assert_eq!(welcome.message.sender.as_str(), "SYSTEM");
    assert!(welcome.message.text.contains("neo"));
    assert_eq!(welcome.message.channel, ChannelRef::Global);
    assert_eq!(welcome.storage_channel, ChannelRef::Global);
    assert!(!welcome.message.timestamp.is_empty());
}

#[test]
fn nothing_arrives_before_network_latency() {
    let (mut client, clock) = client_with(&SimulationConfig::default());
    let mut view = RenderQueue::default();

    client.join("neo").unwrap();
    clock.advance(Duration::from_millis(99));

    assert_eq!(client.pump(&mut view).unwrap(), 0);
    assert!(view.events().is_empty());
    assert_eq!(client.time_to_next_deadline(), Some(Duration::from_millis(1)));
}

#[test]
fn configured_latency_is_honoured() {
    let config = SimulationConfig {
        network_latency: Duration::from_millis(400),
        ..SimulationConfig::default()
    };
    let (mut client, clock) = client_with(&config);
    let mut view = RenderQueue::default();

    client.join("neo").unwrap();
    clock.advance(Duration::from_millis(399));
    assert_eq!(client.pump(&mut view).unwrap(), 0);
    clock.advance(Duration::from_millis(1));
    assert_eq!(client.pump(&mut view).unwrap(), 2);
}

#[test]
fn roster_lists_configured_peers_but_not_local_user() {
    let config = SimulationConfig {
        peers: vec![id("trinity"), id("morpheus")],
        ..SimulationConfig::default()
    };
    let (mut client, clock) = client_with(&config);
    let mut view = RenderQueue::default();

    client.join("neo").unwrap();
    clock.advance(Duration::from_millis(100));
    client.pump(&mut view).unwrap();

    assert_eq!(client.roster(), &[id("trinity"), id("morpheus")]);
    assert!(!client.roster().contains(&id("neo")));
}

#[test]
fn welcome_is_archived_under_global() {
    let (mut client, clock) = client_with(&SimulationConfig::default());
    let mut view = RenderQueue::default();

    client.join("neo").unwrap();
    clock.advance(Duration::from_millis(100));
    client.pump(&mut view).unwrap();

    let global = client.messages_for(&ChannelRef::Global);
    assert_eq!(global.len(), 1);
    assert!(global[0].message.is_system());
}
