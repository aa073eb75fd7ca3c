//! `MockChat` — chat client backed by a simulated, in-process relay.

pub mod app;
pub mod chat;
pub mod config;
pub mod ui;
