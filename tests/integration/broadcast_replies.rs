//! Integration tests for the broadcast reply policy.
//!
//! Verifies:
//! 1. With an empty roster, broadcasts are echoed and never answered.
//! 2. With a roster, the observed reply rate converges to 0.3.
//! 3. Broadcast replies come from roster members and stay in `global`.
//! 4. A broadcast never triggers a direct reply, and vice versa.

use std::time::Duration;

use mockchat::app::RenderQueue;
use mockchat::chat::ChatClient;
use mockchat_proto::{ChannelRef, Identity};
use mockchat_relay::clock::ManualClock;
use mockchat_relay::config::SimulationConfig;
use mockchat_relay::responder::{DEFAULT_PHRASES, RandomSource, ScriptedRandom};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn id(name: &str) -> Identity {
    Identity::parse(name).unwrap()
}

fn crew_config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        peers: vec![id("trinity"), id("morpheus"), id("tank")],
        seed: Some(seed),
        ..SimulationConfig::default()
    }
}

/// Join as `neo`, send `sends` broadcasts, let every reply land, and return
/// the messages archived under `global` that were not sent by `neo`.
fn broadcast_replies<R: RandomSource>(
    config: &SimulationConfig,
    random: R,
    sends: usize,
) -> Vec<(Identity, String, ChannelRef)> {
    let clock = ManualClock::new();
    let mut client = ChatClient::new(config, clock.clone(), random);
    let mut view = RenderQueue::default();

    client.join("neo").unwrap();
    for i in 0..sends {
        client.send(&format!("broadcast {i}"), ChannelRef::Global).unwrap();
    }
    clock.advance(Duration::from_secs(10));
    client.pump(&mut view).unwrap();

    client
        .messages_for(&ChannelRef::Global)
        .into_iter()
        .filter(|stored| !stored.message.is_system() && stored.message.sender != id("neo"))
        .map(|stored| {
            (
                stored.message.sender.clone(),
                stored.message.text.clone(),
                stored.storage_channel.clone(),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn empty_roster_never_replies() {
    let config = SimulationConfig {
        seed: Some(3),
        ..SimulationConfig::default()
    };
    let replies = broadcast_replies(&config, config.random_source(), 1_000);
    assert!(replies.is_empty());
}

#[test]
fn reply_rate_converges_to_configured_probability() {
    let config = crew_config(2024);
    let sends = 2_000;
    let replies = broadcast_replies(&config, config.random_source(), sends);

    let rate = replies.len() as f64 / sends as f64;
    assert!((rate - 0.3).abs() < 0.05, "observed reply rate {rate}");
}

#[test]
fn replies_come_from_roster_with_known_phrases() {
    let config = crew_config(11);
    let replies = broadcast_replies(&config, config.random_source(), 200);

    assert!(!replies.is_empty());
    for (sender, text, storage) in replies {
        assert!(config.peers.contains(&sender), "unexpected sender {sender}");
        assert!(DEFAULT_PHRASES.contains(&text.as_str()), "unexpected phrase {text}");
        assert_eq!(storage, ChannelRef::Global);
    }
}

#[test]
fn scripted_rolls_decide_each_broadcast() {
    let config = crew_config(0);
    // Rolls below 0.3 reply; the indices pick sender then phrase.
    let random = ScriptedRandom::new([0.1, 0.9, 0.29], [2, 5, 0, 3]);
    let replies = broadcast_replies(&config, random, 3);

    assert_eq!(
        replies,
        vec![
            (id("tank"), "Uploading...".to_string(), ChannelRef::Global),
            (id("trinity"), "System needs a reboot.".to_string(), ChannelRef::Global),
        ]
    );
}

#[test]
fn broadcast_reply_waits_for_its_delay() {
    let config = crew_config(0);
    let clock = ManualClock::new();
    let mut client = ChatClient::new(&config, clock.clone(), ScriptedRandom::new([0.0], [0, 0]));
    let mut view = RenderQueue::default();

    client.join("neo").unwrap();
    client.send("anyone?", ChannelRef::Global).unwrap();
    clock.advance(Duration::from_millis(100));
    client.pump(&mut view).unwrap();
    assert_eq!(client.messages_for(&ChannelRef::Global).len(), 2);

    clock.advance(Duration::from_millis(1999));
    client.pump(&mut view).unwrap();
    assert_eq!(client.messages_for(&ChannelRef::Global).len(), 2);

    clock.advance(Duration::from_millis(1));
    client.pump(&mut view).unwrap();
    assert_eq!(client.messages_for(&ChannelRef::Global).len(), 3);
}

#[test]
fn direct_message_never_triggers_broadcast_reply() {
    let config = crew_config(0);
    let clock = ManualClock::new();
    let mut client = ChatClient::new(&config, clock.clone(), ScriptedRandom::new([0.0], [0, 0]));
    let mut view = RenderQueue::default();

    client.join("neo").unwrap();
    client.send("psst", ChannelRef::Direct(id("trinity"))).unwrap();
    clock.advance(Duration::from_secs(10));
    client.pump(&mut view).unwrap();

    // Only the welcome announcement is in global.
    assert_eq!(client.messages_for(&ChannelRef::Global).len(), 1);
    assert_eq!(client.messages_for(&ChannelRef::Direct(id("trinity"))).len(), 2);
}
