//! `MockChat` simulated relay.
//!
//! Stands in for a chat server without any network: client commands are
//! delayed by a [`network::NetworkSimulator`], handled against a
//! [`presence::PresenceDirectory`], answered by a
//! [`responder::ResponderEngine`], and published back through an
//! [`bus::EventBus`]. Every delayed effect lives in a
//! [`scheduler::Scheduler`] driven by an injectable [`clock::Clock`].

pub mod bus;
pub mod clock;
pub mod config;
pub mod network;
pub mod presence;
pub mod relay;
pub mod responder;
pub mod scheduler;

pub use relay::{RelayError, SimulatedRelay};
